//! I/O operations for duplexcat.
//!
//! This module handles all file I/O:
//! - Loading source PDFs from disk, one at a time
//! - Writing the merged PDF atomically
//!
//! # Examples
//!
//! ```no_run
//! use duplexcat::io::{PdfReader, PdfWriter};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let source = reader.load(&PathBuf::from("input.pdf")).await?;
//!
//! let writer = PdfWriter::new();
//! writer.save(&source.document, &PathBuf::from("output.pdf")).await?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::{PdfReader, SourceDocument};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};

use crate::error::Result;
use lopdf::Document;
use std::path::Path;

/// Load a PDF document from a file.
///
/// Convenience function for loading a single PDF.
///
/// # Errors
///
/// Returns `UnreadableDocument` if the file cannot be read, is not a valid
/// PDF, or has no pages.
///
/// # Examples
///
/// ```no_run
/// use duplexcat::io::load_pdf;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let doc = load_pdf(Path::new("document.pdf")).await?;
/// println!("Loaded PDF with {} pages", doc.get_pages().len());
/// # Ok(())
/// # }
/// ```
pub async fn load_pdf(path: &Path) -> Result<Document> {
    let reader = PdfReader::new();
    let source = reader.load(path).await?;
    Ok(source.document)
}

/// Save a PDF document to a file, replacing any existing one.
///
/// # Errors
///
/// Returns `OutputWriteFailure` if the file cannot be written.
pub async fn save_pdf(doc: &Document, path: &Path) -> Result<()> {
    let writer = PdfWriter::new();
    writer.save(doc, path).await
}
