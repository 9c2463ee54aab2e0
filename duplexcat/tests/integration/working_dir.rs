//! Integration tests for the default configuration, which works on the
//! current directory. These change the process working directory and must
//! not run concurrently.

use duplexcat::Config;
use duplexcat::merge::{merge_pdfs, read_outline};
use serial_test::serial;
use std::path::{Path, PathBuf};

use crate::common::write_source;

/// Restores the working directory when dropped.
struct CwdGuard(PathBuf);

impl CwdGuard {
    fn enter(dir: &Path) -> Self {
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        Self(previous)
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.0);
    }
}

#[tokio::test]
#[serial]
async fn test_default_config_merges_current_directory() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    write_source(temp_dir.path(), "a.pdf", 3, 300);
    write_source(temp_dir.path(), "b.pdf", 2, 400);

    let _guard = CwdGuard::enter(temp_dir.path());
    let (report, _) = merge_pdfs(&Config::default()).await.unwrap();

    let output = temp_dir.path().join("merged_pdf.pdf");
    assert!(output.exists());
    assert_eq!(report.total_pages, 6);

    let doc = lopdf::Document::load(&output).unwrap();
    assert_eq!(read_outline(&doc).unwrap(), report.outline);
}

#[tokio::test]
#[serial]
async fn test_rerun_in_place_ignores_previous_output() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    write_source(temp_dir.path(), "a.pdf", 1, 300);

    let _guard = CwdGuard::enter(temp_dir.path());
    merge_pdfs(&Config::default()).await.unwrap();
    let (report, _) = merge_pdfs(&Config::default()).await.unwrap();

    assert_eq!(report.sources.len(), 1);
    assert_eq!(report.total_pages, 2);
}
