//! Positioned drawing operations for one page.

use serde::{Deserialize, Serialize};

use super::metrics::{FontFamily, FontStyle};
use crate::photo::RasterImage;

/// A drawing operation in PDF user space (points, origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Stroked rectangle
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
    },
    /// One line of text; `y` is the baseline
    Text {
        style: FontStyle,
        size: f32,
        x: f32,
        y: f32,
        text: String,
    },
    /// The photograph stretched into a box
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Where a row landed, in layout units measured from the top of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowPlacement {
    /// Row label as given
    pub label: String,
    /// Top edge of the row
    pub top: f32,
    /// Bottom edge of the last value line (gap excluded)
    pub bottom: f32,
    /// Number of value lines
    pub line_count: usize,
}

/// Summary of a layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    /// One entry per field, in input order
    pub rows: Vec<RowPlacement>,
    /// Lowest point reached by row content, in layout units
    pub content_bottom: f32,
    /// Whether rows ran past the bottom border
    pub overflow: bool,
}

impl LayoutReport {
    /// Number of rows placed.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of value lines across all rows.
    pub fn line_count(&self) -> usize {
        self.rows.iter().map(|r| r.line_count).sum()
    }
}

/// A fully laid-out page, ready for serialization.
#[derive(Debug, Clone)]
pub struct PagePlan {
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Font family for every text element
    pub font_family: FontFamily,
    /// Drawing operations in paint order
    pub elements: Vec<Element>,
    /// Decoded photograph referenced by [`Element::Image`]
    pub image: Option<RasterImage>,
    /// Document title for the info dictionary
    pub title: String,
    /// Row placement summary
    pub report: LayoutReport,
}

impl PagePlan {
    /// Text elements in paint order.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether a given font style is used anywhere on the page.
    pub fn uses_style(&self, style: FontStyle) -> bool {
        self.elements
            .iter()
            .any(|e| matches!(e, Element::Text { style: s, .. } if *s == style))
    }
}
