//! Output formatting and display for duplexcat.
//!
//! This module handles all user-facing output:
//! - Formatted status messages
//! - Merge plans and summaries
//! - Quiet and verbose modes
//!
//! # Examples
//!
//! ```no_run
//! use duplexcat::output::OutputFormatter;
//! use duplexcat::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge operation");
//! formatter.success("Merge completed successfully");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::io::WriteStatistics;
use crate::merge::{MergeReport, MergeStatistics};

/// One line per source: where it starts, how long it is, whether it is padded.
pub fn report_lines(report: &MergeReport) -> Vec<String> {
    report
        .sources
        .iter()
        .map(|source| {
            let padding = if source.padded { " + 1 blank" } else { "" };
            format!(
                "{} -> page {} ({} page{}{padding})",
                source.name,
                source.start_offset + 1,
                source.page_count,
                if source.page_count == 1 { "" } else { "s" },
            )
        })
        .collect()
}

/// Display the per-source layout and any skipped sources.
pub fn display_report(formatter: &OutputFormatter, report: &MergeReport) {
    for (index, line) in report_lines(report).iter().enumerate() {
        formatter.list_item(index + 1, line);
    }

    for skipped in &report.skipped {
        formatter.warning(&format!("Skipped {}: {}", skipped.name, skipped.reason));
    }
}

/// Display the layout a dry run would produce.
pub fn display_plan(formatter: &OutputFormatter, report: &MergeReport, output: &std::path::Path) {
    formatter.section(&format!("Dry run: would write {}", output.display()));
    display_report(formatter, report);
    formatter.info(&format!(
        "{} source(s), {} page(s) including {} blank",
        report.sources.len(),
        report.total_pages,
        report.blank_pages
    ));
}

/// Display the result of a completed merge.
pub fn display_summary(
    formatter: &OutputFormatter,
    report: &MergeReport,
    stats: &MergeStatistics,
    write: &WriteStatistics,
) {
    if formatter.is_verbose() {
        display_report(formatter, report);
    } else {
        for skipped in &report.skipped {
            formatter.warning(&format!("Skipped {}: {}", skipped.name, skipped.reason));
        }
    }

    formatter.detail("Input size", &stats.format_input_size());
    formatter.detail(
        "Load time",
        &format!("{:.2}s", stats.load_time.as_secs_f64()),
    );
    formatter.detail(
        "Merge time",
        &format!("{:.2}s", stats.merge_time.as_secs_f64()),
    );

    formatter.success(&format!(
        "Merged {} file(s) into {} ({} pages, {} blank, {})",
        stats.files_merged,
        write.output_path.display(),
        stats.total_pages,
        stats.blank_pages,
        write.format_file_size()
    ));
}
