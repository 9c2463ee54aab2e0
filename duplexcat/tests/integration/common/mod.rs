//! Shared helpers for the integration tests.
//!
//! Input PDFs are generated on the fly with lopdf. Every page of a generated
//! source carries the source's width in its MediaBox, and its content stream
//! names the source and page, so the origin of any output page can be read
//! back from the merged file.

use duplexcat::Config;
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Height of every generated page.
pub const PAGE_HEIGHT: i64 = 792;

/// Write a `pages`-page PDF named `name` into `dir`, with pages `width` points wide.
pub fn write_source(dir: &Path, name: &str, pages: usize, width: i64) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::with_capacity(pages);
    for number in 1..=pages {
        let text = format!("BT /F1 24 Tf 72 700 Td ({name} page {number}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, text.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), PAGE_HEIGHT.into()],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    // Resources live on the page tree node and are inherited by every page.
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).expect("failed to write generated source");
    path
}

/// A scratch directory with a config pointing at it.
pub struct Workspace {
    /// Holds the directory alive.
    pub dir: TempDir,
    /// Config merging `dir` into `dir/merged_pdf.pdf`.
    pub config: Config,
}

impl Workspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let config = Config {
            quiet: true,
            ..Config::new(dir.path(), dir.path().join("merged_pdf.pdf"))
        };
        Self { dir, config }
    }

    /// Path of the workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a generated source.
    pub fn add(&self, name: &str, pages: usize, width: i64) -> PathBuf {
        write_source(self.path(), name, pages, width)
    }

    /// Add a file with arbitrary bytes.
    pub fn add_raw(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, bytes).expect("failed to write file");
        path
    }

    /// Load the merged output.
    pub fn output(&self) -> Document {
        Document::load(&self.config.output).expect("failed to load merged output")
    }

    /// Names of all files in the workspace, sorted.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path())
            .expect("failed to list workspace")
            .map(|e| e.expect("bad entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Width of every page of `doc`, in page order.
pub fn page_widths(doc: &Document) -> Vec<f32> {
    doc.get_pages()
        .into_values()
        .map(|id| page_width(doc, id))
        .collect()
}

/// Width of one page, from its MediaBox.
pub fn page_width(doc: &Document, page_id: ObjectId) -> f32 {
    let page = doc.get_dictionary(page_id).expect("page is not a dictionary");
    let Ok(Object::Array(media_box)) = page.get(b"MediaBox") else {
        panic!("page {page_id:?} has no MediaBox");
    };
    match &media_box[2] {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r,
        other => panic!("unexpected MediaBox width {other:?}"),
    }
}

/// Decoded content of every page, in page order.
pub fn page_texts(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .into_values()
        .map(|id| String::from_utf8_lossy(&doc.get_page_content(id).unwrap_or_default()).into_owned())
        .collect()
}
