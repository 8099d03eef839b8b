//! # profilepdf
//!
//! Deterministic single-page PDF profile sheets.
//!
//! A [`DocumentSpec`] (title, ordered label/value rows and an optional photo)
//! is laid out on one fixed page: a border, a centered title, the photo in
//! the top-right corner, and one row per field with the value wrapped inside
//! its column. The same input always yields the same bytes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use profilepdf::{render, DocumentSpec};
//!
//! fn main() -> profilepdf::Result<()> {
//!     let spec = DocumentSpec::new("Volleyball Player Profile")
//!         .with_field("Full Name", "H.N. Anupama Perera")?
//!         .with_field("Selected Position", "Setter")?
//!         .with_image(std::fs::read("photo.jpg")?);
//!
//!     let pdf = render(&spec)?;
//!     std::fs::write("generated_cv.pdf", pdf)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Fixed layout**: no reflow, no pagination, every offset configurable
//! - **Standard fonts**: Helvetica or Courier, nothing to embed or miss
//! - **In-memory photos**: JPEG and PNG decoded without temporary files
//! - **Read-back**: [`inspect`] recovers page count and text from the output

pub mod delivery;
pub mod error;
pub mod inspect;
pub mod layout;
pub mod model;
pub mod photo;
pub mod profile;
pub mod writer;

// Re-export commonly used types
pub use delivery::{Download, CONTENT_TYPE, DEFAULT_FILENAME};
pub use error::{Error, Result};
pub use inspect::{inspect_bytes, inspect_file, DocumentSummary, TextRun};
pub use layout::{
    BoxRect, FontFamily, LayoutEngine, LayoutOptions, LayoutReport, RenderResult,
    RenderedDocument, RowPlacement, Unit,
};
pub use model::{DocumentSpec, FieldEntry};
pub use photo::{PhotoFormat, RasterImage};
pub use profile::{PlayerProfile, Position, DEFAULT_TITLE};

/// Render a document with the default A4 layout.
///
/// # Example
///
/// ```no_run
/// use profilepdf::{render, DocumentSpec};
///
/// let spec = DocumentSpec::new("Profile").with_field("Email", "a@b.lk").unwrap();
/// let bytes = render(&spec).unwrap();
/// assert!(bytes.starts_with(b"%PDF-"));
/// ```
pub fn render(spec: &DocumentSpec) -> RenderResult {
    LayoutEngine::default().render(spec)
}

/// Render a document with custom layout options.
///
/// # Example
///
/// ```no_run
/// use profilepdf::{render_with_options, DocumentSpec, LayoutOptions};
///
/// let options = LayoutOptions::new().with_line_height(7.0).with_compression(false);
/// let spec = DocumentSpec::new("Profile");
/// let bytes = render_with_options(&spec, options).unwrap();
/// ```
pub fn render_with_options(spec: &DocumentSpec, options: LayoutOptions) -> RenderResult {
    LayoutEngine::new(options)?.render(spec)
}

/// Validate a player profile and render its sheet.
///
/// A blank `title` uses [`DEFAULT_TITLE`].
pub fn render_profile(
    profile: &PlayerProfile,
    title: &str,
    photo: Option<Vec<u8>>,
) -> Result<Download> {
    let spec = profile.to_document_spec(title, photo)?;
    let bytes = render(&spec)?;
    Ok(Download::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_spec() {
        let bytes = render(&DocumentSpec::new("")).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn test_render_with_invalid_options() {
        let options = LayoutOptions::new().with_page_size(0.0, 297.0);
        let result = render_with_options(&DocumentSpec::new("x"), options);
        assert!(matches!(result, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn test_render_with_bad_photo_produces_nothing() {
        let spec = DocumentSpec::new("x").with_image(vec![0u8; 64]);
        let result = render(&spec);
        assert!(matches!(result, Err(Error::ImageDecode(_))));
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LayoutEngine>();
        assert_send_sync::<DocumentSpec>();
    }
}
