//! Input types for a render pass.

mod field;
mod spec;

pub use field::FieldEntry;
pub use spec::DocumentSpec;
