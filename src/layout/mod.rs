//! Fixed-offset page layout.
//!
//! A render pass runs in two steps: [`LayoutEngine::plan`] positions every
//! element of a [`DocumentSpec`](crate::model::DocumentSpec) on one page, then
//! the writer serializes the plan. Nothing reflows and nothing paginates.

mod engine;
pub mod metrics;
mod options;
mod plan;
mod wrap;

pub use engine::{LayoutEngine, RenderResult, RenderedDocument};
pub use metrics::{FontFamily, FontStyle};
pub use options::{BoxRect, LayoutOptions, Unit};
pub use plan::{Element, LayoutReport, PagePlan, RowPlacement};
pub use wrap::wrap_text;
