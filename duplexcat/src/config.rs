//! Configuration module for duplexcat.
//!
//! A [`Config`] describes one merge run: which directory to enumerate, where
//! the merged document goes, and how the output is finished. The CLI builds
//! it from arguments; library callers can start from [`Config::default`],
//! which reproduces the classic behavior (current directory in,
//! `merged_pdf.pdf` out, US Letter padding pages).

use anyhow::{Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::DuplexcatError;
use std::{path::PathBuf, str::FromStr};

/// Output file name used when none is given.
pub const DEFAULT_OUTPUT: &str = "merged_pdf.pdf";

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - streams are written as they were read.
    None,
    /// Compress content streams.
    #[default]
    Standard,
    /// Compress streams and prune objects no page or outline references.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = DuplexcatError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(DuplexcatError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Geometry of synthesized blank pages.
///
/// One size is used for every padding page of a run, whatever the size of
/// the source being padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// US Letter, 8.5 x 11 in.
    #[default]
    Letter,
    /// ISO A4, 210 x 297 mm.
    A4,
    /// US Legal, 8.5 x 14 in.
    Legal,
}

impl PageSize {
    /// Width and height in PDF points (1/72 in).
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            Self::Letter => (612.0, 792.0),
            Self::A4 => (595.276, 841.89),
            Self::Legal => (612.0, 1008.0),
        }
    }
}

impl FromStr for PageSize {
    type Err = DuplexcatError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "letter" => Ok(Self::Letter),
            "a4" => Ok(Self::A4),
            "legal" => Ok(Self::Legal),
            _ => Err(DuplexcatError::invalid_config(format!(
                "Invalid blank page size: {s}. Must be one of: letter, a4, legal"
            ))),
        }
    }
}

/// PDF metadata to set on the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Document keywords (comma-separated).
    pub keywords: Option<String>,
}

impl Metadata {
    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
    }

    /// Create metadata from optional strings, trimming whitespace.
    pub fn new(
        title: Option<String>,
        author: Option<String>,
        subject: Option<String>,
        keywords: Option<String>,
    ) -> Self {
        let to_string_opt = |opt: Option<String>| {
            opt.filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
        };

        Self {
            title: to_string_opt(title),
            author: to_string_opt(author),
            subject: to_string_opt(subject),
            keywords: to_string_opt(keywords),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Replace an existing output file.
    #[default]
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a merge run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory whose `.pdf` files are merged.
    pub input_dir: PathBuf,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Plan the merge without writing output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Size of synthesized padding pages.
    pub blank_page: PageSize,

    /// Metadata to set on output document.
    pub metadata: Metadata,

    /// Skip unreadable sources instead of aborting the run.
    pub continue_on_error: bool,

    /// Glob patterns matched against file names to leave out.
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output: PathBuf::from(DEFAULT_OUTPUT),
            dry_run: false,
            verbose: false,
            quiet: false,
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            blank_page: PageSize::default(),
            metadata: Metadata::default(),
            continue_on_error: false,
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Create a configuration merging `input_dir` into `output`.
    pub fn new(input_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - The output path has no file name
    /// - An exclude pattern is not a valid glob
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.output.file_name().is_none() {
            bail!(
                "Output path must name a file: {}",
                self.output.display()
            );
        }

        self.exclude_set()?;

        Ok(())
    }

    /// Compile the exclude patterns.
    pub fn exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => bail!("Invalid exclude pattern '{pattern}': {err}"),
            }
        }
        Ok(builder.build()?)
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
