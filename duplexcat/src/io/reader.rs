//! PDF reading: turning one source file into a [`SourceDocument`].
//!
//! The reader never modifies the file it opens. Parsing runs on tokio's
//! blocking pool; the caller awaits each source before asking for the next,
//! so documents are ingested strictly one at a time.
//!
//! # Examples
//!
//! ```no_run
//! use duplexcat::io::reader::PdfReader;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let source = reader.load(Path::new("chapter-01.pdf")).await?;
//! println!("{} has {} pages", source.name, source.page_count());
//! # Ok(())
//! # }
//! ```

use lopdf::{Document, ObjectId};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::{DuplexcatError, Result};

/// An ingested source document.
///
/// Immutable once loaded; it is consumed when its pages are copied into the
/// output.
#[derive(Debug)]
pub struct SourceDocument {
    /// File name, used as the outline label.
    pub name: String,

    /// Path the document was read from.
    pub path: PathBuf,

    /// The parsed document.
    pub document: Document,

    /// Page object ids in reading order.
    pub pages: Vec<ObjectId>,

    /// File size in bytes.
    pub file_size: u64,

    /// Time taken to parse the document.
    pub load_time: Duration,
}

impl SourceDocument {
    /// Build a source from a parsed document.
    ///
    /// # Errors
    ///
    /// Returns `UnreadableDocument` if the document has no pages.
    pub fn from_document(
        path: PathBuf,
        document: Document,
        file_size: u64,
        load_time: Duration,
    ) -> Result<Self> {
        let pages: Vec<ObjectId> = document.get_pages().into_values().collect();
        if pages.is_empty() {
            return Err(DuplexcatError::unreadable(&path, "PDF has no pages"));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            path,
            document,
            pages,
            file_size,
            load_time,
        })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Loads PDF sources from disk.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns `UnreadableDocument` if:
    /// - File cannot be read
    /// - File is not a valid PDF
    /// - PDF is encrypted and cannot be opened without a password
    /// - PDF has no pages
    pub async fn load(&self, path: &Path) -> Result<SourceDocument> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DuplexcatError::unreadable(path, e.to_string()))?;

        self.load_bytes(path, bytes).await
    }

    /// Parse an in-memory PDF as if it had been read from `path`.
    pub async fn load_bytes(&self, path: &Path, bytes: Vec<u8>) -> Result<SourceDocument> {
        let path_buf = path.to_path_buf();

        task::spawn_blocking(move || parse_source(path_buf, &bytes))
            .await
            .map_err(|e| DuplexcatError::other(format!("Load task failed: {e}")))?
    }
}

/// Parse bytes into a source document, classifying failures.
pub fn parse_source(path: PathBuf, bytes: &[u8]) -> Result<SourceDocument> {
    let start = Instant::now();

    if bytes.is_empty() {
        return Err(DuplexcatError::unreadable(path, "File is empty"));
    }

    let document = Document::load_mem(bytes).map_err(|e| {
        let err_msg = e.to_string();
        let lowered = err_msg.to_lowercase();
        if lowered.contains("encrypt") || lowered.contains("password") {
            DuplexcatError::encrypted(&path)
        } else {
            DuplexcatError::unreadable(&path, err_msg)
        }
    })?;

    // lopdf returns a hollow document when the empty password is rejected.
    if document.is_encrypted() && document.encryption_state.is_none() {
        return Err(DuplexcatError::encrypted(path));
    }

    let source = SourceDocument::from_document(path, document, bytes.len() as u64, start.elapsed())?;

    log::debug!(
        "Ingested {} ({} pages) in {:?}",
        source.name,
        source.page_count(),
        source.load_time
    );

    Ok(source)
}
