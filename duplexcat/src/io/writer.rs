//! PDF writing and saving operations.
//!
//! Output is written atomically: the document is serialized into a temporary
//! file next to the target and renamed over it only after every byte has been
//! flushed. A failed write leaves neither a partial output nor the temporary
//! behind.
//!
//! # Examples
//!
//! ```no_run
//! use duplexcat::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # async fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! writer.save(&doc, Path::new("merged_pdf.pdf")).await?;
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tokio::task;

use crate::config::OverwriteMode;
use crate::error::{DuplexcatError, Result};
use crate::utils::format_file_size;

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,

    /// What to do when the output already exists.
    pub overwrite_mode: OverwriteMode,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            buffer_size: 8192,
            overwrite_mode: OverwriteMode::Force,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer that refuses to replace an existing file.
    pub fn no_clobber() -> Self {
        Self {
            options: WriteOptions {
                overwrite_mode: OverwriteMode::NoClobber,
                ..Default::default()
            },
        }
    }

    /// Save a PDF document to a file.
    ///
    /// # Errors
    ///
    /// Returns `OutputExists` in no-clobber mode when the target exists, and
    /// `OutputWriteFailure` if the document cannot be written.
    pub async fn save(&self, doc: &Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).await.map(|_| ())
    }

    /// Save a PDF and return statistics about the operation.
    pub async fn save_with_stats(&self, doc: &Document, path: &Path) -> Result<WriteStatistics> {
        let doc_clone = doc.clone();
        self.save_owned(doc_clone, path).await
    }

    /// Save a document the caller no longer needs, avoiding a clone.
    pub async fn save_owned(&self, mut doc: Document, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();

        if options.overwrite_mode == OverwriteMode::NoClobber && self.exists(path).await {
            return Err(DuplexcatError::output_exists(path_buf));
        }

        task::spawn_blocking(move || {
            let start = Instant::now();
            let fail = |e: std::io::Error| DuplexcatError::output_write_failure(&path_buf, e);

            let parent = match path_buf.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };

            // Dropped (and deleted) on every early return below.
            let temp = tempfile::Builder::new()
                .prefix(".duplexcat-")
                .suffix(".tmp")
                .tempfile_in(&parent)
                .map_err(fail)?;

            {
                let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, temp.as_file());
                doc.save_to(&mut writer)
                    .map_err(|e| fail(std::io::Error::other(e)))?;
                writer.flush().map_err(fail)?;
            }
            temp.as_file().sync_all().map_err(fail)?;

            persist_output(temp, &path_buf, options.overwrite_mode)?;

            let file_size = std::fs::metadata(&path_buf).map(|m| m.len()).unwrap_or(0);

            log::info!(
                "Wrote {} ({})",
                path_buf.display(),
                format_file_size(file_size)
            );

            Ok::<_, DuplexcatError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| DuplexcatError::other(format!("Write task failed: {e}")))?
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

/// Move a finished temporary file onto `path`.
///
/// In no-clobber mode a target that appeared after the early existence check
/// is still left alone.
fn persist_output(temp: NamedTempFile, path: &Path, mode: OverwriteMode) -> Result<()> {
    let persisted = match mode {
        OverwriteMode::NoClobber => temp.persist_noclobber(path),
        OverwriteMode::Force => temp.persist(path),
    };

    match persisted {
        Ok(_) => Ok(()),
        Err(e) if mode == OverwriteMode::NoClobber
            && e.error.kind() == std::io::ErrorKind::AlreadyExists =>
        {
            Err(DuplexcatError::output_exists(path))
        }
        Err(e) => Err(DuplexcatError::output_write_failure(path, e.error)),
    }
}
