//! PDF metadata management.
//!
//! Handles the document information dictionary of the merged output:
//! - Title, Author, Subject, Keywords
//! - Creator, Producer
//! - Creation and modification dates

use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Document, Object};

use crate::config::Metadata;
use crate::error::{DuplexcatError, Result};
use crate::utils::{decode_text_string, text_string};

/// Manager for PDF metadata.
#[derive(Debug, Clone, Default)]
pub struct MetadataManager;

impl MetadataManager {
    /// Create a new metadata manager.
    pub fn new() -> Self {
        Self
    }

    /// Set metadata on a document.
    ///
    /// Updates the document's Info dictionary with the provided metadata.
    /// Only non-empty fields are set; an empty `metadata` leaves the document
    /// untouched.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use duplexcat::merge::metadata::MetadataManager;
    /// # use duplexcat::config::Metadata;
    /// # use lopdf::Document;
    /// # fn example(mut doc: Document) -> Result<(), Box<dyn std::error::Error>> {
    /// let manager = MetadataManager::new();
    /// let metadata = Metadata::new(Some("Week 3 handouts".to_string()), None, None, None);
    /// manager.set_metadata(&mut doc, &metadata)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_metadata(&self, doc: &mut Document, metadata: &Metadata) -> Result<()> {
        self.set_metadata_at(doc, metadata, Utc::now())
    }

    /// Set metadata with an explicit timestamp for the date fields.
    pub fn set_metadata_at(
        &self,
        doc: &mut Document,
        metadata: &Metadata,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if metadata.is_empty() {
            return Ok(());
        }

        let info_id = match doc.trailer.get(b"Info").and_then(Object::as_reference) {
            Ok(id) => id,
            Err(_) => {
                let id = doc.add_object(Dictionary::new());
                doc.trailer.set("Info", Object::Reference(id));
                id
            }
        };

        if doc.get_dictionary(info_id).is_err() {
            doc.objects
                .insert(info_id, Object::Dictionary(Dictionary::new()));
        }

        let info = doc.get_dictionary_mut(info_id).map_err(|e| {
            DuplexcatError::merge_failed(format!("Failed to open Info dictionary: {e}"))
        })?;

        let fields = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Keywords", &metadata.keywords),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                info.set(key, text_string(value));
            }
        }

        info.set("Creator", text_string(crate::NAME));
        info.set(
            "Producer",
            text_string(&format!("{} {}", crate::NAME, crate::VERSION)),
        );

        let date = format_pdf_date(now);
        info.set("CreationDate", text_string(&date));
        info.set("ModDate", text_string(&date));

        Ok(())
    }

    /// Get metadata from a document.
    pub fn get_metadata(&self, doc: &Document) -> Metadata {
        let Some(info) = doc
            .trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .ok()
            .and_then(|id| doc.get_dictionary(id).ok())
        else {
            return Metadata::default();
        };

        Metadata::new(
            Self::get_string_field(info, b"Title"),
            Self::get_string_field(info, b"Author"),
            Self::get_string_field(info, b"Subject"),
            Self::get_string_field(info, b"Keywords"),
        )
    }

    fn get_string_field(dict: &Dictionary, key: &[u8]) -> Option<String> {
        match dict.get(key) {
            Ok(Object::String(bytes, _)) => Some(decode_text_string(bytes)),
            _ => None,
        }
    }

    /// Check if a document has metadata.
    pub fn has_metadata(&self, doc: &Document) -> bool {
        doc.trailer.has(b"Info")
    }
}

/// Format a timestamp as a PDF date string (`D:YYYYMMDDHHmmSSZ`).
pub fn format_pdf_date(time: DateTime<Utc>) -> String {
    time.format("D:%Y%m%d%H%M%SZ").to_string()
}
