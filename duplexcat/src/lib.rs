//! duplexcat - Merge a directory of PDF files into one duplex-ready document.
//!
//! Every `.pdf` file in a directory is appended, in file-name order, to a
//! single output document. Each source's block of pages is padded to an even
//! length with a blank page, so every source starts on the front of a sheet
//! when printed double-sided, and the output gets one bookmark per source
//! pointing at the first page of its block.
//!
//! # Examples
//!
//! ## Merge a directory
//!
//! ```no_run
//! use duplexcat::Config;
//! use duplexcat::merge::merge_pdfs;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new("handouts", "handouts/merged_pdf.pdf");
//! let (report, _write_stats) = merge_pdfs(&config).await?;
//! for entry in &report.outline {
//!     println!("{} starts on page {}", entry.label, entry.offset + 1);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use duplexcat::io::PdfReader;
//! use duplexcat::merge::SourceEnumerator;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sources = SourceEnumerator::new(Path::new(".")).enumerate()?;
//! let reader = PdfReader::new();
//! for path in &sources {
//!     let source = reader.load(path).await?;
//!     println!("{}: {} pages", source.name, source.page_count());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{DuplexcatError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
