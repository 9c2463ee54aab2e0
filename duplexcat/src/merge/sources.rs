//! Source enumeration.
//!
//! Lists the `.pdf` files directly inside one directory, sorted by file name.
//! The extension match is case-sensitive (`report.PDF` is not a source) and
//! subdirectories are never descended into.

use globset::GlobSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{DuplexcatError, Result};

/// Extension a file name must end with to be merged.
pub const PDF_EXTENSION: &str = ".pdf";

/// Enumerates merge sources in a directory.
#[derive(Debug, Clone)]
pub struct SourceEnumerator {
    dir: PathBuf,
    skip_path: Option<PathBuf>,
    exclude: GlobSet,
}

impl SourceEnumerator {
    /// Create an enumerator for `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            skip_path: None,
            exclude: GlobSet::empty(),
        }
    }

    /// Leave `path` out of the listing if it lives in the directory.
    ///
    /// Used for the output file, so a rerun never merges its own result.
    pub fn excluding_path(mut self, path: &Path) -> Self {
        self.skip_path = Some(path.to_path_buf());
        self
    }

    /// Leave out file names matching any pattern in `exclude`.
    pub fn with_exclude(mut self, exclude: GlobSet) -> Self {
        self.exclude = exclude;
        self
    }

    /// List the sources in merge order.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryUnavailable` if the directory cannot be listed.
    pub fn enumerate(&self) -> Result<Vec<PathBuf>> {
        let metadata = std::fs::metadata(&self.dir)
            .map_err(|e| DuplexcatError::directory_unavailable(&self.dir, e))?;
        if !metadata.is_dir() {
            return Err(DuplexcatError::directory_unavailable(
                &self.dir,
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
            ));
        }

        let skip = self
            .skip_path
            .as_deref()
            .and_then(|p| std::fs::canonicalize(p).ok());

        let mut sources = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.dir).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                DuplexcatError::directory_unavailable(path, source)
            })?;

            // Symlinks to files count; the file type of the link itself does not.
            let is_file = if entry.file_type().is_symlink() {
                entry.path().is_file()
            } else {
                entry.file_type().is_file()
            };
            if !is_file {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                log::debug!("Skipping non UTF-8 file name: {}", entry.path().display());
                continue;
            };

            if !name.ends_with(PDF_EXTENSION) {
                continue;
            }

            if self.exclude.is_match(name) {
                log::debug!("Excluded by pattern: {name}");
                continue;
            }

            if let Some(skip) = &skip
                && std::fs::canonicalize(entry.path()).is_ok_and(|p| &p == skip)
            {
                log::debug!("Skipping output file: {name}");
                continue;
            }

            sources.push(entry.into_path());
        }

        log::info!(
            "Found {} source(s) in {}",
            sources.len(),
            self.dir.display()
        );

        Ok(sources)
    }
}
