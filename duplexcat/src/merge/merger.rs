//! Core merge implementation.
//!
//! Sources are enumerated, then ingested and appended strictly one at a time.
//! The running page offset is owned here and threaded through
//! [`place_source`]: each source gets an outline entry at the current offset,
//! its pages are appended, and an odd page count is padded with one blank
//! page so the next source starts on an even offset.

use lopdf::Document;
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::{CompressionLevel, Config};
use crate::error::{DuplexcatError, Result};
use crate::io::{PdfReader, PdfWriter, SourceDocument, WriteOptions, WriteStatistics};
use crate::merge::assembly::{Assembled, OutputAssembly, PageOrigin};
use crate::merge::blank::BlankPageSynthesizer;
use crate::merge::metadata::MetadataManager;
use crate::merge::outline::OutlineEntry;
use crate::merge::sources::SourceEnumerator;
use crate::utils::format_file_size;

/// Where one source's block lands in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePlacement {
    /// Output index of the block's first page.
    pub start: usize,

    /// Pages contributed by the source itself.
    pub page_count: usize,

    /// Whether a blank page follows the source's last page.
    pub padded: bool,
}

impl SourcePlacement {
    /// Place a source of `page_count` pages at `start`.
    pub fn new(start: usize, page_count: usize) -> Self {
        Self {
            start,
            page_count,
            padded: page_count % 2 == 1,
        }
    }

    /// Length of the block, padding included. Always even.
    pub fn block_len(&self) -> usize {
        self.page_count + usize::from(self.padded)
    }

    /// Offset at which the next source starts.
    pub fn next_offset(&self) -> usize {
        self.start + self.block_len()
    }
}

/// Per-source line of a [`MergeReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    /// Source file name.
    pub name: String,

    /// Pages in the source.
    pub page_count: usize,

    /// Output index of the source's first page.
    pub start_offset: usize,

    /// Whether a blank page was added after the source.
    pub padded: bool,
}

impl SourceSummary {
    fn new(name: String, placement: &SourcePlacement) -> Self {
        Self {
            name,
            page_count: placement.page_count,
            start_offset: placement.start,
            padded: placement.padded,
        }
    }
}

/// A source left out of the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSource {
    /// Source file name.
    pub name: String,

    /// Why it was left out.
    pub reason: String,
}

/// What a merge run produced, or would produce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Merged sources, in output order.
    pub sources: Vec<SourceSummary>,

    /// Sources skipped because they could not be read.
    pub skipped: Vec<SkippedSource>,

    /// Outline entries, one per merged source.
    pub outline: Vec<OutlineEntry>,

    /// Pages in the output.
    pub total_pages: usize,

    /// Padding pages among `total_pages`.
    pub blank_pages: usize,
}

impl MergeReport {
    fn push(&mut self, name: String, placement: &SourcePlacement) {
        self.outline.push(OutlineEntry {
            label: name.clone(),
            offset: placement.start,
        });
        self.sources.push(SourceSummary::new(name, placement));
        self.total_pages = placement.next_offset();
        self.blank_pages += usize::from(placement.padded);
    }
}

/// Statistics about a merge operation.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStatistics {
    /// Number of sources merged.
    pub files_merged: usize,

    /// Number of sources skipped.
    pub files_skipped: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Number of padding pages added.
    pub blank_pages: usize,

    /// Total size of merged sources.
    pub input_size: u64,

    /// Time spent parsing sources.
    pub load_time: Duration,

    /// Total time taken for the merge.
    pub merge_time: Duration,

    /// Whether compression was applied.
    pub compressed: bool,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }
}

/// Result of a merge operation.
#[derive(Debug)]
pub struct MergeResult {
    /// The merged PDF document.
    pub document: Document,

    /// Per-source layout and outline.
    pub report: MergeReport,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,

    /// Origin of every output page.
    pub provenance: Vec<PageOrigin>,
}

/// Result of a merge run that may have written a file.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Per-source layout and outline.
    pub report: MergeReport,

    /// Merge statistics, absent for a dry run.
    pub statistics: Option<MergeStatistics>,

    /// Write statistics, absent for a dry run.
    pub write: Option<WriteStatistics>,
}

/// Append one source at `offset`, padding it to an even length.
///
/// Returns the source's placement; its `next_offset` is where the following
/// source starts.
pub fn place_source(
    assembly: &mut OutputAssembly,
    blanks: &BlankPageSynthesizer,
    source: SourceDocument,
    offset: usize,
) -> Result<SourcePlacement> {
    let placement = SourcePlacement::new(offset, source.page_count());

    assembly.record_outline(source.name.clone(), placement.start);

    let appended = assembly.append_source(source)?;
    if appended != placement.page_count {
        return Err(DuplexcatError::merge_failed(format!(
            "expected {} pages, appended {appended}",
            placement.page_count
        )));
    }

    if placement.padded {
        assembly.append_blank(blanks.synthesize()?)?;
    }

    Ok(placement)
}

/// PDF merger for a directory of sources.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    /// Reader for loading PDFs.
    reader: PdfReader,

    /// Metadata manager for document properties.
    metadata_manager: MetadataManager,
}

impl Merger {
    /// Create a new merger with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the configured directory into an in-memory document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The input directory cannot be listed
    /// - A source cannot be read (unless `continue_on_error` is set)
    /// - The output document cannot be assembled
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use duplexcat::merge::Merger;
    /// # use duplexcat::Config;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let merger = Merger::new();
    /// let result = merger.merge(&Config::new("scans", "scans.pdf")).await?;
    /// println!("Merged {} files into {} pages",
    ///          result.statistics.files_merged,
    ///          result.statistics.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge(&self, config: &Config) -> Result<MergeResult> {
        let merge_start = Instant::now();
        let paths = self.enumerate(config)?;

        let blanks = BlankPageSynthesizer::new(config.blank_page);
        let mut assembly = OutputAssembly::new();
        let mut report = MergeReport::default();
        let mut offset = 0;
        let mut load_time = Duration::ZERO;
        let mut input_size = 0;

        for path in &paths {
            let Some(source) = self.load_source(path, config, &mut report).await? else {
                continue;
            };
            load_time += source.load_time;
            input_size += source.file_size;

            let name = source.name.clone();
            let placement = place_source(&mut assembly, &blanks, source, offset)?;
            log::debug!(
                "{name}: pages {}..{}{}",
                placement.start,
                placement.start + placement.page_count,
                if placement.padded { " + blank" } else { "" }
            );

            report.push(name, &placement);
            offset = placement.next_offset();
        }

        let Assembled {
            mut document,
            outline,
            provenance,
        } = assembly.finish()?;
        debug_assert_eq!(outline, report.outline);

        self.metadata_manager
            .set_metadata(&mut document, &config.metadata)?;

        match config.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => document.compress(),
            CompressionLevel::Maximum => {
                document.compress();
                document.prune_objects();
            }
        }
        document.renumber_objects();

        let statistics = MergeStatistics {
            files_merged: report.sources.len(),
            files_skipped: report.skipped.len(),
            total_pages: report.total_pages,
            blank_pages: report.blank_pages,
            input_size,
            load_time,
            merge_time: merge_start.elapsed(),
            compressed: config.compression != CompressionLevel::None,
        };

        log::info!(
            "Merged {} source(s) into {} page(s), {} blank",
            statistics.files_merged,
            statistics.total_pages,
            statistics.blank_pages
        );

        Ok(MergeResult {
            document,
            report,
            statistics,
            provenance,
        })
    }

    /// Work out the merge layout without assembling anything.
    ///
    /// Every source is still parsed, so unreadable sources fail the plan the
    /// same way they would fail the merge.
    pub async fn plan(&self, config: &Config) -> Result<MergeReport> {
        let paths = self.enumerate(config)?;

        let mut report = MergeReport::default();
        let mut offset = 0;

        for path in &paths {
            let Some(source) = self.load_source(path, config, &mut report).await? else {
                continue;
            };
            let placement = SourcePlacement::new(offset, source.page_count());
            offset = placement.next_offset();
            report.push(source.name, &placement);
        }

        Ok(report)
    }

    /// Merge and write the output file, or only plan for a dry run.
    ///
    /// Nothing is written unless every step succeeds.
    pub async fn merge_to_file(&self, config: &Config) -> Result<MergeOutcome> {
        if config.dry_run {
            let report = self.plan(config).await?;
            return Ok(MergeOutcome {
                report,
                statistics: None,
                write: None,
            });
        }

        let writer = PdfWriter::with_options(WriteOptions {
            overwrite_mode: config.overwrite_mode,
            ..WriteOptions::default()
        });

        // Fail before parsing any source.
        if config.overwrite_mode == crate::config::OverwriteMode::NoClobber
            && writer.exists(&config.output).await
        {
            return Err(DuplexcatError::output_exists(&config.output));
        }

        let result = self.merge(config).await?;
        let write = writer.save_owned(result.document, &config.output).await?;

        Ok(MergeOutcome {
            report: result.report,
            statistics: Some(result.statistics),
            write: Some(write),
        })
    }

    fn enumerate(&self, config: &Config) -> Result<Vec<std::path::PathBuf>> {
        config.validate()?;
        let exclude = config.exclude_set()?;

        SourceEnumerator::new(&config.input_dir)
            .excluding_path(&config.output)
            .with_exclude(exclude)
            .enumerate()
    }

    /// Load one source, or record it as skipped when the run allows it.
    async fn load_source(
        &self,
        path: &Path,
        config: &Config,
        report: &mut MergeReport,
    ) -> Result<Option<SourceDocument>> {
        match self.reader.load(path).await {
            Ok(source) => Ok(Some(source)),
            Err(e) if config.continue_on_error && e.is_recoverable() => {
                log::warn!("Skipping {}: {e}", path.display());
                report.skipped.push(SkippedSource {
                    name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string()),
                    reason: e.to_string(),
                });
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
