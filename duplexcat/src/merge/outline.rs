//! Outline (bookmark) recording, writing and reading.
//!
//! The merged document gets one top-level outline item per source, titled
//! with the source's file name and pointing at the first page of its block.

use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;

use crate::error::{DuplexcatError, Result};
use crate::utils::{decode_text_string, text_string};

/// One outline item: a label and the zero-based page it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    /// Source file name.
    pub label: String,

    /// Index of the first page of the source's block in the output.
    pub offset: usize,
}

/// Accumulates outline entries in merge order.
#[derive(Debug, Clone, Default)]
pub struct OutlineRecorder {
    entries: Vec<OutlineEntry>,
}

impl OutlineRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    ///
    /// Offsets must strictly increase from one call to the next.
    pub fn record(&mut self, label: impl Into<String>, offset: usize) {
        debug_assert!(
            self.entries.last().is_none_or(|last| last.offset < offset),
            "outline offsets must strictly increase"
        );
        self.entries.push(OutlineEntry {
            label: label.into(),
            offset,
        });
    }

    /// Entries recorded so far.
    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the recorder, returning its entries.
    pub fn into_entries(self) -> Vec<OutlineEntry> {
        self.entries
    }
}

/// Write `entries` as the document outline.
///
/// `page_ids` maps output page indexes to page objects. Nothing is written
/// for an empty outline.
///
/// # Errors
///
/// Returns `MergeFailed` if an entry points past the last page or the
/// document has no catalog.
pub fn write_outline(
    doc: &mut Document,
    entries: &[OutlineEntry],
    page_ids: &[ObjectId],
) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    let outline_id = doc.new_object_id();

    let mut item_ids = Vec::with_capacity(entries.len());
    for entry in entries {
        let page_id = page_ids.get(entry.offset).copied().ok_or_else(|| {
            DuplexcatError::merge_failed(format!(
                "Outline entry '{}' points at page {} of {}",
                entry.label,
                entry.offset,
                page_ids.len()
            ))
        })?;

        let item_id = doc.new_object_id();
        item_ids.push(item_id);

        // [page /XYZ null null null] keeps the reader's current zoom.
        let dest = vec![
            Object::Reference(page_id),
            Object::Name(b"XYZ".to_vec()),
            Object::Null,
            Object::Null,
            Object::Null,
        ];

        let mut item = Dictionary::new();
        item.set("Title", text_string(&entry.label));
        item.set("Parent", Object::Reference(outline_id));
        item.set("Dest", Object::Array(dest));
        doc.objects.insert(item_id, Object::Dictionary(item));
    }

    for (i, item_id) in item_ids.iter().enumerate() {
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(*item_id) {
            if i > 0 {
                dict.set("Prev", Object::Reference(item_ids[i - 1]));
            }
            if let Some(next) = item_ids.get(i + 1) {
                dict.set("Next", Object::Reference(*next));
            }
        }
    }

    let mut root = Dictionary::new();
    root.set("Type", Object::Name(b"Outlines".to_vec()));
    root.set("Count", Object::Integer(item_ids.len() as i64));
    if let (Some(first), Some(last)) = (item_ids.first(), item_ids.last()) {
        root.set("First", Object::Reference(*first));
        root.set("Last", Object::Reference(*last));
    }
    doc.objects.insert(outline_id, Object::Dictionary(root));

    let catalog = doc
        .catalog_mut()
        .map_err(|e| DuplexcatError::merge_failed(format!("Failed to get catalog: {e}")))?;
    catalog.set("Outlines", Object::Reference(outline_id));
    catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));

    log::debug!("Wrote outline with {} entries", item_ids.len());

    Ok(())
}

/// Read the top-level outline items of a document.
///
/// Items whose destination is not a page of the document are skipped.
/// A document without an outline yields an empty list.
///
/// # Errors
///
/// Returns `MergeFailed` if the outline item chain loops.
pub fn read_outline(doc: &Document) -> Result<Vec<OutlineEntry>> {
    let page_index: std::collections::HashMap<ObjectId, usize> = doc
        .get_pages()
        .into_values()
        .enumerate()
        .map(|(index, id)| (id, index))
        .collect();

    let Some(root) = doc
        .catalog()
        .ok()
        .and_then(|c| c.get(b"Outlines").ok())
        .and_then(|o| o.as_reference().ok())
        .and_then(|id| doc.get_dictionary(id).ok())
    else {
        return Ok(Vec::new());
    };

    let mut entries = Vec::new();
    let mut next = root.get(b"First").and_then(|o| o.as_reference()).ok();
    let mut visited = std::collections::HashSet::new();

    while let Some(item_id) = next {
        if !visited.insert(item_id) {
            return Err(DuplexcatError::merge_failed("Outline item chain loops"));
        }
        let Ok(item) = doc.get_dictionary(item_id) else {
            break;
        };

        let label = match item.get(b"Title") {
            Ok(Object::String(bytes, _)) => decode_text_string(bytes),
            _ => String::new(),
        };

        let offset = match item.get(b"Dest") {
            Ok(Object::Array(dest)) => match dest.first() {
                Some(Object::Reference(page_id)) => page_index.get(page_id).copied(),
                _ => None,
            },
            _ => None,
        };

        if let Some(offset) = offset {
            entries.push(OutlineEntry { label, offset });
        }

        next = item.get(b"Next").and_then(|o| o.as_reference()).ok();
    }

    Ok(entries)
}
