//! Integration tests for failure handling.
//!
//! Every fatal error must leave the workspace exactly as it was: no merged
//! file and no temporary left behind.

use duplexcat::DuplexcatError;
use duplexcat::config::OverwriteMode;
use duplexcat::merge::merge_pdfs;

use crate::common::Workspace;

#[tokio::test]
async fn test_corrupt_source_aborts_without_output() {
    let ws = Workspace::new();
    ws.add("a.pdf", 2, 300);
    ws.add_raw("b.pdf", b"this is not a pdf");
    ws.add("c.pdf", 2, 300);

    let err = merge_pdfs(&ws.config).await.unwrap_err();

    assert!(matches!(err, DuplexcatError::UnreadableDocument { .. }));
    assert!(err.to_string().contains("b.pdf"));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(ws.file_names(), ["a.pdf", "b.pdf", "c.pdf"]);
}

#[tokio::test]
async fn test_empty_file_is_unreadable() {
    let ws = Workspace::new();
    ws.add_raw("empty.pdf", b"");

    let err = merge_pdfs(&ws.config).await.unwrap_err();

    assert!(matches!(err, DuplexcatError::UnreadableDocument { .. }));
    assert!(!ws.config.output.exists());
}

#[tokio::test]
async fn test_failed_run_keeps_previous_output() {
    let ws = Workspace::new();
    ws.add("a.pdf", 2, 300);
    merge_pdfs(&ws.config).await.unwrap();
    let previous = std::fs::read(&ws.config.output).unwrap();

    ws.add_raw("b.pdf", b"garbage");
    merge_pdfs(&ws.config).await.unwrap_err();

    assert_eq!(std::fs::read(&ws.config.output).unwrap(), previous);
}

#[tokio::test]
async fn test_continue_on_error_skips_and_reports() {
    let mut ws = Workspace::new();
    ws.config.continue_on_error = true;
    ws.add("a.pdf", 3, 300);
    ws.add_raw("b.pdf", b"garbage");
    ws.add("c.pdf", 2, 300);

    let (report, _) = merge_pdfs(&ws.config).await.unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "b.pdf");
    assert_eq!(report.outline[1].label, "c.pdf");
    assert_eq!(report.outline[1].offset, 4);
    assert_eq!(ws.output().get_pages().len(), 6);
}

#[tokio::test]
async fn test_missing_directory() {
    let mut ws = Workspace::new();
    ws.config.input_dir = ws.path().join("does-not-exist");

    let err = merge_pdfs(&ws.config).await.unwrap_err();

    assert!(matches!(err, DuplexcatError::DirectoryUnavailable { .. }));
    assert!(err.to_string().contains("does-not-exist"));
    assert!(!ws.config.output.exists());
}

#[tokio::test]
async fn test_file_as_input_directory() {
    let mut ws = Workspace::new();
    ws.config.input_dir = ws.add("a.pdf", 2, 300);

    let err = merge_pdfs(&ws.config).await.unwrap_err();

    assert!(matches!(err, DuplexcatError::DirectoryUnavailable { .. }));
    assert!(!ws.config.output.exists());
}

#[tokio::test]
async fn test_unwritable_output_location() {
    let mut ws = Workspace::new();
    ws.add("a.pdf", 2, 300);
    ws.config.output = ws.path().join("no-such-dir").join("merged_pdf.pdf");

    let err = merge_pdfs(&ws.config).await.unwrap_err();

    assert!(matches!(err, DuplexcatError::OutputWriteFailure { .. }));
    assert!(!ws.config.output.exists());
}

#[tokio::test]
async fn test_no_clobber_refuses_existing_output() {
    let mut ws = Workspace::new();
    ws.config.overwrite_mode = OverwriteMode::NoClobber;
    ws.add("a.pdf", 2, 300);
    std::fs::write(&ws.config.output, b"keep").unwrap();

    let err = merge_pdfs(&ws.config).await.unwrap_err();

    assert!(matches!(err, DuplexcatError::OutputExists { .. }));
    assert_eq!(std::fs::read(&ws.config.output).unwrap(), b"keep");
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let mut ws = Workspace::new();
    ws.config.verbose = true;
    ws.config.quiet = true;

    let err = merge_pdfs(&ws.config).await.unwrap_err();

    assert!(matches!(err, DuplexcatError::InvalidConfig { .. }));
}
