//! Blank page synthesis.
//!
//! A padding page is rendered into its own single-page in-memory document,
//! which the assembly imports exactly like a source page and then drops.
//! Every padding page of a run has the same geometry, taken from
//! [`PageSize`], regardless of the size of the page it follows.

use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::config::PageSize;
use crate::error::{DuplexcatError, Result};

/// A synthesized page, still inside its scratch document.
#[derive(Debug)]
pub struct BlankPage {
    /// Scratch document owning the page and its content stream.
    pub document: Document,

    /// The page object in `document`.
    pub page_id: ObjectId,
}

/// Produces empty pages of one fixed size.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankPageSynthesizer {
    size: PageSize,
}

impl BlankPageSynthesizer {
    /// Create a synthesizer for pages of `size`.
    pub fn new(size: PageSize) -> Self {
        Self { size }
    }

    /// Produce one empty page.
    ///
    /// # Errors
    ///
    /// Returns `BlankPageFailed` if the page tree of the scratch document
    /// cannot be resolved.
    pub fn synthesize(&self) -> Result<BlankPage> {
        let (width, height) = self.size.dimensions();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => dictionary! {},
            "Contents" => content_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if doc.get_pages().len() != 1 {
            return Err(DuplexcatError::blank_page_failed(
                "scratch document does not resolve to exactly one page",
            ));
        }

        Ok(BlankPage {
            document: doc,
            page_id,
        })
    }
}
