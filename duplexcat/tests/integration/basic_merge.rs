//! Integration tests for merging a directory.

use duplexcat::config::{CompressionLevel, Metadata, PageSize};
use duplexcat::merge::{MetadataManager, merge_pdfs, read_outline};

use crate::common::{Workspace, page_texts, page_widths};

#[tokio::test]
async fn test_merge_pads_odd_source() {
    let ws = Workspace::new();
    ws.add("a.pdf", 3, 300);
    ws.add("b.pdf", 2, 400);

    let (report, write) = merge_pdfs(&ws.config).await.unwrap();

    assert!(write.is_some());
    assert_eq!(report.total_pages, 6);
    assert_eq!(report.blank_pages, 1);

    let doc = ws.output();
    assert_eq!(
        page_widths(&doc),
        [300.0, 300.0, 300.0, 612.0, 400.0, 400.0]
    );
}

#[tokio::test]
async fn test_page_count_is_sum_of_even_blocks() {
    let ws = Workspace::new();
    let counts = [1, 2, 3, 4, 5, 7];
    for (i, count) in counts.iter().enumerate() {
        ws.add(&format!("{i:02}.pdf"), *count, 500);
    }

    merge_pdfs(&ws.config).await.unwrap();

    let expected: usize = counts.iter().map(|c| c + c % 2).sum();
    assert_eq!(ws.output().get_pages().len(), expected);
}

#[tokio::test]
async fn test_even_sources_get_no_padding() {
    let ws = Workspace::new();
    ws.add("a.pdf", 2, 300);
    ws.add("b.pdf", 4, 400);

    let (report, _) = merge_pdfs(&ws.config).await.unwrap();

    assert_eq!(report.blank_pages, 0);
    assert!(!page_widths(&ws.output()).contains(&612.0));
}

#[tokio::test]
async fn test_pages_keep_source_order() {
    let mut ws = Workspace::new();
    ws.config.compression = CompressionLevel::None;
    ws.add("b.pdf", 2, 400);
    ws.add("a.pdf", 1, 300);

    merge_pdfs(&ws.config).await.unwrap();

    let texts = page_texts(&ws.output());
    assert!(texts[0].contains("a.pdf page 1"));
    assert!(texts[1].is_empty(), "padding page should be empty");
    assert!(texts[2].contains("b.pdf page 1"));
    assert!(texts[3].contains("b.pdf page 2"));
}

#[tokio::test]
async fn test_inherited_resources_survive() {
    let ws = Workspace::new();
    ws.add("a.pdf", 2, 300);

    merge_pdfs(&ws.config).await.unwrap();

    let doc = ws.output();
    for page_id in doc.get_pages().into_values() {
        let page = doc.get_dictionary(page_id).unwrap();
        assert!(page.has(b"Resources"), "page {page_id:?} lost its resources");
    }
}

#[tokio::test]
async fn test_blank_size_is_configurable() {
    let mut ws = Workspace::new();
    ws.config.blank_page = PageSize::Legal;
    ws.add("a.pdf", 1, 300);

    merge_pdfs(&ws.config).await.unwrap();

    let doc = ws.output();
    let blank_id = doc.get_pages()[&2];
    let page = doc.get_dictionary(blank_id).unwrap();
    let Ok(lopdf::Object::Array(media_box)) = page.get(b"MediaBox") else {
        panic!("blank page has no MediaBox");
    };
    assert!(matches!(media_box[3], lopdf::Object::Real(h) if h == 1008.0));
}

#[tokio::test]
async fn test_merge_is_deterministic() {
    let ws = Workspace::new();
    ws.add("x.pdf", 3, 300);
    ws.add("y.pdf", 5, 400);
    ws.add("z.pdf", 2, 500);

    let (first, _) = merge_pdfs(&ws.config).await.unwrap();
    let first_doc = ws.output();
    let (second, _) = merge_pdfs(&ws.config).await.unwrap();
    let second_doc = ws.output();

    assert_eq!(first, second);
    assert_eq!(page_widths(&first_doc), page_widths(&second_doc));
    assert_eq!(
        read_outline(&first_doc).unwrap(),
        read_outline(&second_doc).unwrap()
    );
}

#[tokio::test]
async fn test_sources_are_not_modified() {
    let ws = Workspace::new();
    let a = ws.add("a.pdf", 3, 300);
    let before = std::fs::read(&a).unwrap();

    merge_pdfs(&ws.config).await.unwrap();

    assert_eq!(std::fs::read(&a).unwrap(), before);
}

#[tokio::test]
async fn test_non_pdf_files_are_ignored() {
    let ws = Workspace::new();
    ws.add("a.pdf", 2, 300);
    ws.add("upper.PDF", 2, 400);
    ws.add_raw("notes.txt", b"not a pdf");
    std::fs::create_dir(ws.path().join("sub.pdf")).unwrap();

    let (report, _) = merge_pdfs(&ws.config).await.unwrap();

    assert_eq!(report.sources.len(), 1);
    assert_eq!(report.sources[0].name, "a.pdf");
}

#[tokio::test]
async fn test_metadata_is_written() {
    let mut ws = Workspace::new();
    ws.config.metadata = Metadata::new(Some("Week 3".to_string()), None, None, None);
    ws.add("a.pdf", 2, 300);

    merge_pdfs(&ws.config).await.unwrap();

    let metadata = MetadataManager::new().get_metadata(&ws.output());
    assert_eq!(metadata.title, Some("Week 3".to_string()));
}

#[tokio::test]
async fn test_maximum_compression_keeps_pages() {
    let mut ws = Workspace::new();
    ws.config.compression = CompressionLevel::Maximum;
    ws.add("a.pdf", 3, 300);
    ws.add("b.pdf", 1, 400);

    merge_pdfs(&ws.config).await.unwrap();

    let doc = ws.output();
    assert_eq!(page_widths(&doc), [300.0, 300.0, 300.0, 612.0, 400.0, 612.0]);
    assert_eq!(read_outline(&doc).unwrap().len(), 2);
}
