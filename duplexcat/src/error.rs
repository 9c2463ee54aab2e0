//! Error types for duplexcat.
//!
//! Every failure a merge run can hit is a [`DuplexcatError`]. Errors carry the
//! offending path where one exists so the message alone tells the operator
//! which file or directory to look at.
//!
//! # Error Categories
//!
//! - **Input enumeration**: the input directory cannot be listed
//! - **Document errors**: a source cannot be parsed (corrupt, encrypted, empty)
//! - **Output errors**: the merged document cannot be written
//! - **Configuration errors**: invalid options or an existing output in no-clobber mode

use std::io;
use std::path::PathBuf;

/// Result type alias for duplexcat operations.
pub type Result<T> = std::result::Result<T, DuplexcatError>;

/// Main error type for duplexcat operations.
#[derive(Debug, thiserror::Error)]
pub enum DuplexcatError {
    /// The input directory could not be listed.
    #[error("Cannot list input directory: {}\n  Reason: {source}", .path.display())]
    DirectoryUnavailable {
        /// Directory that was being enumerated.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A source file is not a parseable PDF document.
    #[error("Unreadable PDF: {}\n  Reason: {reason}", .path.display())]
    UnreadableDocument {
        /// Path to the source document.
        path: PathBuf,
        /// Why the document could not be used.
        reason: String,
    },

    /// The merged document could not be written.
    #[error("Failed to write output file: {}\n  Reason: {source}", .path.display())]
    OutputWriteFailure {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Output file already exists and overwriting is disabled.
    #[error(
        "Output file already exists: {}\n  Remove it or run without --no-clobber",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// A blank padding page could not be produced or appended.
    #[error("Failed to synthesize blank page: {reason}")]
    BlankPageFailed {
        /// Details about the failure.
        reason: String,
    },

    /// Page tree or outline assembly failed.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for DuplexcatError {
    fn from(err: lopdf::Error) -> Self {
        Self::merge_failed(err.to_string())
    }
}

// Configuration checks are written with anyhow.
impl From<anyhow::Error> for DuplexcatError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(err.to_string())
    }
}

impl DuplexcatError {
    /// Create a DirectoryUnavailable error.
    pub fn directory_unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::DirectoryUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create an UnreadableDocument error.
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::UnreadableDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnreadableDocument error for an encrypted source.
    pub fn encrypted(path: impl Into<PathBuf>) -> Self {
        Self::unreadable(
            path,
            "document is encrypted\n  Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        )
    }

    /// Create an OutputWriteFailure error.
    pub fn output_write_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::OutputWriteFailure {
            path: path.into(),
            source,
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        Self::OutputExists { path: path.into() }
    }

    /// Create a BlankPageFailed error.
    pub fn blank_page_failed(reason: impl Into<String>) -> Self {
        Self::BlankPageFailed {
            reason: reason.into(),
        }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if the run may skip past this error in continue-on-error mode.
    ///
    /// Only a single unreadable source qualifies; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnreadableDocument { .. })
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DirectoryUnavailable { .. } => 2,
            Self::UnreadableDocument { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::OutputWriteFailure { .. } => 5,
            Self::Io { .. } => 5,
            Self::BlankPageFailed { .. } => 6,
            Self::MergeFailed { .. } => 6,
            Self::InvalidConfig { .. } => 1,
            Self::Other { .. } => 1,
        }
    }
}
