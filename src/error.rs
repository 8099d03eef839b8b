//! Error types for profilepdf.

use std::io;
use thiserror::Error;

/// Result type alias for profilepdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or rendering a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading inputs or writing output files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The image is corrupt or not in a supported format (JPEG, PNG).
    #[error("Image decoding error: {0}")]
    ImageDecode(String),

    /// The underlying PDF primitives failed to produce a document.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Caller input failed validation.
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// Human-readable explanation
        reason: String,
    },

    /// Layout options are inconsistent or out of range.
    #[error("Invalid layout options: {0}")]
    InvalidOptions(String),

    /// The bytes could not be read back as a PDF.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a validation error for a named field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure was caused by malformed input rather than a
    /// transient resource problem. Such failures must not be retried.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::ImageDecode(_)
                | Error::Validation { .. }
                | Error::InvalidOptions(_)
                | Error::Json(_)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

/// Photos are decoded from memory, so every image failure is a decode failure.
impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageDecode(err.to_string())
    }
}
