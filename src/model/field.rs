//! Label/value rows.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One label/value row on the page.
///
/// The label is never empty. The value may be empty, in which case the row
/// is drawn blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldEntry")]
pub struct FieldEntry {
    label: String,
    value: String,
}

impl FieldEntry {
    /// Create a new entry, rejecting a blank label.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(Error::validation("label", "must not be empty"));
        }
        Ok(Self {
            label,
            value: value.into(),
        })
    }

    /// Row label, drawn in the left column.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Row value, wrapped in the right column.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the value renders as a blank row.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl TryFrom<(String, String)> for FieldEntry {
    type Error = Error;

    fn try_from((label, value): (String, String)) -> Result<Self> {
        Self::new(label, value)
    }
}

#[derive(Deserialize)]
struct RawFieldEntry {
    label: String,
    #[serde(default)]
    value: String,
}

impl TryFrom<RawFieldEntry> for FieldEntry {
    type Error = Error;

    fn try_from(raw: RawFieldEntry) -> Result<Self> {
        Self::new(raw.label, raw.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_label_rejected() {
        assert!(matches!(
            FieldEntry::new("", "x"),
            Err(Error::Validation { .. })
        ));
        assert!(FieldEntry::new("   ", "x").is_err());
    }

    #[test]
    fn test_empty_value_allowed() {
        let entry = FieldEntry::new("Address", "").unwrap();
        assert!(entry.is_blank());
        assert_eq!(entry.label(), "Address");
    }

    #[test]
    fn test_deserialize_validates_label() {
        let ok: FieldEntry = serde_json::from_str(r#"{"label":"Email"}"#).unwrap();
        assert_eq!(ok.value(), "");

        let bad = serde_json::from_str::<FieldEntry>(r#"{"label":"","value":"x"}"#);
        assert!(bad.is_err());
    }
}
