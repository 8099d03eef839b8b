//! PDF serialization of laid-out pages.

mod pdf;

pub use pdf::{PdfWriter, IMAGE_RESOURCE, PDF_VERSION};
