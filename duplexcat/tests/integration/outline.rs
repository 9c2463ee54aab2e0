//! Integration tests for the per-source outline.

use duplexcat::merge::{OutlineEntry, merge_pdfs, read_outline};

use crate::common::Workspace;

fn entry(label: &str, offset: usize) -> OutlineEntry {
    OutlineEntry {
        label: label.to_string(),
        offset,
    }
}

#[tokio::test]
async fn test_outline_points_at_block_starts() {
    let ws = Workspace::new();
    ws.add("a.pdf", 3, 300);
    ws.add("b.pdf", 2, 400);

    let (report, _) = merge_pdfs(&ws.config).await.unwrap();

    let expected = vec![entry("a.pdf", 0), entry("b.pdf", 4)];
    assert_eq!(report.outline, expected);
    assert_eq!(read_outline(&ws.output()).unwrap(), expected);
}

#[tokio::test]
async fn test_offsets_are_sums_of_earlier_blocks() {
    let ws = Workspace::new();
    let counts = [5, 1, 2, 3];
    for (i, count) in counts.iter().enumerate() {
        ws.add(&format!("part-{i}.pdf"), *count, 500);
    }

    merge_pdfs(&ws.config).await.unwrap();
    let outline = read_outline(&ws.output()).unwrap();

    let mut expected_offset = 0;
    for (entry, count) in outline.iter().zip(counts) {
        assert_eq!(entry.offset, expected_offset);
        assert_eq!(entry.offset % 2, 0);
        expected_offset += count + count % 2;
    }
    assert_eq!(outline.len(), counts.len());
}

#[tokio::test]
async fn test_outline_labels_are_file_names() {
    let ws = Workspace::new();
    ws.add("Übung 1.pdf", 2, 300);
    ws.add("week 2.pdf", 2, 300);

    merge_pdfs(&ws.config).await.unwrap();

    let labels: Vec<String> = read_outline(&ws.output())
        .unwrap()
        .into_iter()
        .map(|e| e.label)
        .collect();
    assert_eq!(labels, ["week 2.pdf", "Übung 1.pdf"]);
}

#[tokio::test]
async fn test_outline_opens_by_default() {
    let ws = Workspace::new();
    ws.add("a.pdf", 1, 300);

    merge_pdfs(&ws.config).await.unwrap();

    let doc = ws.output();
    let catalog = doc.catalog().unwrap();
    assert!(matches!(
        catalog.get(b"PageMode"),
        Ok(lopdf::Object::Name(mode)) if mode == b"UseOutlines"
    ));
}

#[tokio::test]
async fn test_empty_directory_has_no_outline() {
    let ws = Workspace::new();

    let (report, _) = merge_pdfs(&ws.config).await.unwrap();

    assert!(report.outline.is_empty());
    let doc = ws.output();
    assert_eq!(doc.get_pages().len(), 0);
    assert!(read_outline(&doc).unwrap().is_empty());
}
