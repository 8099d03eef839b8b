//! The input of a single render pass.

use serde::{Deserialize, Serialize};

use super::FieldEntry;
use crate::error::Result;

/// Everything the layout engine needs to produce one page.
///
/// The photo is carried as raw encoded bytes (JPEG or PNG). It is decoded
/// during rendering, never staged on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSpec {
    /// Title drawn centered at the top of the page
    pub title: String,

    /// Rows in visual order, top to bottom
    #[serde(default)]
    pub fields: Vec<FieldEntry>,

    /// Optional encoded photograph
    #[serde(skip)]
    pub image: Option<Vec<u8>>,
}

impl DocumentSpec {
    /// Create a spec with a title and no rows.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            image: None,
        }
    }

    /// Append a row.
    pub fn with_field(mut self, label: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        self.fields.push(FieldEntry::new(label, value)?);
        Ok(self)
    }

    /// Append an already-built row.
    pub fn with_entry(mut self, entry: FieldEntry) -> Self {
        self.fields.push(entry);
        self
    }

    /// Replace all rows.
    pub fn with_fields(mut self, fields: Vec<FieldEntry>) -> Self {
        self.fields = fields;
        self
    }

    /// Attach an encoded photograph.
    pub fn with_image(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.image = Some(bytes.into());
        self
    }

    /// Number of rows.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Whether a photograph is attached.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}
