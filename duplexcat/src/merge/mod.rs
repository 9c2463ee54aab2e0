//! PDF merging operations.
//!
//! This module provides the merge pipeline:
//! - Source enumeration in file-name order
//! - Page import into one flat page tree
//! - Blank-page padding to even block lengths
//! - One outline entry per source
//! - Metadata management
//!
//! # Examples
//!
//! ```no_run
//! use duplexcat::merge::Merger;
//! use duplexcat::Config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new("lecture-notes", "lecture-notes.pdf");
//!
//! let merger = Merger::new();
//! let result = merger.merge(&config).await?;
//! println!("Merged {} pages", result.statistics.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod assembly;
pub mod blank;
pub mod merger;
pub mod metadata;
pub mod outline;
pub mod sources;

pub use assembly::{OutputAssembly, PageOrigin};
pub use blank::{BlankPage, BlankPageSynthesizer};
pub use merger::{
    MergeOutcome, MergeReport, MergeResult, MergeStatistics, Merger, SourcePlacement,
    place_source,
};
pub use metadata::MetadataManager;
pub use outline::{OutlineEntry, OutlineRecorder, read_outline};
pub use sources::SourceEnumerator;

use crate::config::Config;
use crate::error::Result;
use crate::io::WriteStatistics;

/// Merge the configured directory into the configured output file.
///
/// Convenience function that creates a merger and runs it. For a dry run the
/// report describes the planned layout and no write statistics are returned.
///
/// # Errors
///
/// Returns an error if any merge step fails. No output file is left behind
/// in that case.
///
/// # Examples
///
/// ```no_run
/// use duplexcat::merge::merge_pdfs;
/// use duplexcat::Config;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (report, _) = merge_pdfs(&Config::default()).await?;
/// println!("Created {} page document", report.total_pages);
/// # Ok(())
/// # }
/// ```
pub async fn merge_pdfs(config: &Config) -> Result<(MergeReport, Option<WriteStatistics>)> {
    let outcome = Merger::new().merge_to_file(config).await?;
    Ok((outcome.report, outcome.write))
}
