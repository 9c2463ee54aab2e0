//! CLI argument parsing for duplexcat.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is also compiled into the build script to render the man page, so it
//! only refers to the library by its crate name.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use duplexcat::config::{
    CompressionLevel, Config, DEFAULT_OUTPUT, Metadata, OverwriteMode, PageSize,
};
use duplexcat::error::{DuplexcatError, Result};

/// Merge every PDF in a directory into one duplex-ready document.
///
/// Files ending in `.pdf` are merged in file-name order. A source with an odd
/// page count is followed by a blank page, so every source starts on the
/// front of a sheet when printed double-sided. The output gets one bookmark
/// per source.
#[derive(Parser, Debug)]
#[command(name = "duplexcat")]
#[command(version)]
#[command(about = "Merge every PDF in a directory into one duplex-ready document", long_about = None)]
#[command(author)]
pub struct Cli {
    /// Directory containing the PDFs to merge
    ///
    /// Only files directly inside the directory whose names end in `.pdf`
    /// (lowercase) are merged.
    #[arg(value_name = "DIR", default_value = ".")]
    pub input_dir: PathBuf,

    /// Output PDF file path
    ///
    /// An existing file is replaced unless --no-clobber is given. When the
    /// output lives in DIR it is never merged into itself.
    #[arg(short, long, value_name = "FILE", env = "DUPLEXCAT_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Dry run - show the merge layout without writing output
    ///
    /// Every source is still opened, so unreadable files are reported.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show the layout and timings
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Never overwrite an existing output file
    #[arg(long)]
    pub no_clobber: bool,

    /// Compression level for output PDF
    ///
    /// - none: streams are written as read
    /// - standard: compress content streams (default)
    /// - maximum: also drop unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Size of the blank pages added after odd-length sources
    #[arg(long, value_name = "SIZE", default_value = "letter")]
    #[arg(value_parser = ["letter", "a4", "legal"])]
    pub blank_size: String,

    /// Set title metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Set author metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Set subject metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub subject: Option<String>,

    /// Set keywords metadata for output PDF (comma-separated)
    #[arg(long, value_name = "TEXT")]
    pub keywords: Option<String>,

    /// Skip unreadable PDFs instead of aborting
    ///
    /// By default the first unreadable file stops the run and nothing is
    /// written. With this flag such files are left out with a warning.
    #[arg(long)]
    pub continue_on_error: bool,

    /// Leave out files whose names match this glob (repeatable)
    ///
    /// Example:
    ///   duplexcat --exclude 'draft-*' --exclude scratch.pdf
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Print the merge report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a value cannot be parsed or the resulting
    /// configuration does not validate.
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;
        let blank_page = PageSize::from_str(&self.blank_size)?;

        let overwrite_mode = if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Force
        };

        let metadata = Metadata::new(
            self.title.clone(),
            self.author.clone(),
            self.subject.clone(),
            self.keywords.clone(),
        );

        let config = Config {
            input_dir: self.input_dir.clone(),
            output: self.output.clone(),
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            overwrite_mode,
            compression,
            blank_page,
            metadata,
            continue_on_error: self.continue_on_error,
            exclude: self.exclude.clone(),
        };

        config.validate()?;

        Ok(config)
    }
}
