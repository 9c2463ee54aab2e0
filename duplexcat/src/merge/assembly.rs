//! The output document under construction.
//!
//! [`OutputAssembly`] owns the merged document while sources are appended to
//! it. Pages are imported into one flat page tree in the order they are
//! appended; the page tree, catalog and outline are only written when the
//! assembly is finished.

use lopdf::{Document, Object, ObjectId, dictionary};
use serde::Serialize;

use crate::error::{DuplexcatError, Result};
use crate::io::SourceDocument;
use crate::merge::blank::BlankPage;
use crate::merge::outline::{OutlineEntry, OutlineRecorder, write_outline};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Deepest page tree walked when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 64;

/// Where an output page came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageOrigin {
    /// Copied from a source document.
    Source {
        /// Source file name.
        document: String,
        /// One-based page number within the source.
        page_number: usize,
    },
    /// Synthesized padding page.
    Blank,
}

/// A finished assembly.
#[derive(Debug)]
pub struct Assembled {
    /// The merged document, ready to serialize.
    pub document: Document,

    /// Outline entries, in page order.
    pub outline: Vec<OutlineEntry>,

    /// Origin of every output page, by output page index.
    pub provenance: Vec<PageOrigin>,
}

/// Accumulates pages and outline entries for one merge run.
#[derive(Debug)]
pub struct OutputAssembly {
    document: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    provenance: Vec<PageOrigin>,
    outline: OutlineRecorder,
}

impl Default for OutputAssembly {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputAssembly {
    /// Create an empty assembly.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();

        Self {
            document,
            pages_id,
            page_ids: Vec::new(),
            provenance: Vec::new(),
            outline: OutlineRecorder::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Origin of every page appended so far.
    pub fn provenance(&self) -> &[PageOrigin] {
        &self.provenance
    }

    /// Record an outline entry for the block starting at `offset`.
    ///
    /// Must be called before the block's first page is appended.
    pub fn record_outline(&mut self, label: impl Into<String>, offset: usize) {
        debug_assert_eq!(
            offset,
            self.page_count(),
            "outline entry must point at the next page"
        );
        self.outline.record(label, offset);
    }

    /// Append every page of `source`, in order.
    ///
    /// Returns the number of pages appended.
    pub fn append_source(&mut self, source: SourceDocument) -> Result<usize> {
        let name = source.name;
        let imported = self.import(source.document)?;

        for page_number in 1..=imported {
            self.provenance.push(PageOrigin::Source {
                document: name.clone(),
                page_number,
            });
        }

        log::debug!("Appended {imported} page(s) from {name}");
        Ok(imported)
    }

    /// Append one synthesized blank page.
    pub fn append_blank(&mut self, blank: BlankPage) -> Result<()> {
        let imported = self.import(blank.document)?;
        if imported != 1 {
            return Err(DuplexcatError::blank_page_failed(format!(
                "expected one page, got {imported}"
            )));
        }
        self.provenance.push(PageOrigin::Blank);
        Ok(())
    }

    /// Move the pages of `doc` and everything they reference into the output.
    fn import(&mut self, mut doc: Document) -> Result<usize> {
        doc.renumber_objects_with(self.document.max_id + 1);

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();

        for &page_id in &pages {
            materialize_inherited(&mut doc, page_id)?;
            let page = doc.get_dictionary_mut(page_id).map_err(|e| {
                DuplexcatError::merge_failed(format!("Page {page_id:?} is not a dictionary: {e}"))
            })?;
            page.set("Parent", Object::Reference(self.pages_id));
        }

        if doc.version > self.document.version {
            self.document.version = doc.version.clone();
        }

        let max_id = doc.max_id;
        self.document.objects.extend(
            doc.objects
                .into_iter()
                .filter(|(_, object)| !is_tree_root(object)),
        );
        self.document.max_id = self.document.max_id.max(max_id);

        self.page_ids.extend_from_slice(&pages);
        Ok(pages.len())
    }

    /// Write the page tree, catalog and outline, and hand back the document.
    ///
    /// # Errors
    ///
    /// Returns `MergeFailed` if the outline cannot be written.
    pub fn finish(self) -> Result<Assembled> {
        let Self {
            mut document,
            pages_id,
            page_ids,
            provenance,
            outline,
        } = self;

        let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_ids.len() as i64,
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        let outline = outline.into_entries();
        write_outline(&mut document, &outline, &page_ids)?;

        Ok(Assembled {
            document,
            outline,
            provenance,
        })
    }
}

/// Whether `object` is a catalog or page tree node of its source document.
///
/// The output builds its own, so these are never copied.
fn is_tree_root(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => matches!(
            dict.get(b"Type"),
            Ok(Object::Name(name)) if name == b"Catalog" || name == b"Pages"
        ),
        _ => false,
    }
}

/// Copy inheritable attributes from the page's ancestors onto the page.
fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let page = doc.get_dictionary(page_id).map_err(|e| {
        DuplexcatError::merge_failed(format!("Page {page_id:?} is not a dictionary: {e}"))
    })?;

    let mut missing: Vec<&[u8]> = INHERITABLE
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut found = Vec::new();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };

        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    if found.is_empty() {
        return Ok(());
    }

    let page = doc.get_dictionary_mut(page_id).map_err(|e| {
        DuplexcatError::merge_failed(format!("Page {page_id:?} is not a dictionary: {e}"))
    })?;
    for (key, value) in found {
        page.set(key, value);
    }

    Ok(())
}
