//! Layout constants and configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::metrics::FontFamily;
use crate::error::{Error, Result};

/// Unit in which every length of [`LayoutOptions`] is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Millimeters
    #[default]
    Mm,
    /// Centimeters
    Cm,
    /// Inches
    In,
    /// PostScript points (1/72 inch)
    Pt,
}

impl Unit {
    /// Number of points in one unit.
    pub fn points(self) -> f32 {
        match self {
            Unit::Mm => 72.0 / 25.4,
            Unit::Cm => 72.0 / 2.54,
            Unit::In => 72.0,
            Unit::Pt => 1.0,
        }
    }
}

/// An axis-aligned box measured from the top-left corner of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxRect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl BoxRect {
    /// Create a new box.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    fn scaled(self, factor: f32) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

/// Fixed layout constants for one page.
///
/// Lengths are in [`LayoutOptions::unit`]; font sizes are always in points.
/// The defaults describe an A4 profile sheet in millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Unit for every length below
    pub unit: Unit,

    /// Page width
    pub page_width: f32,

    /// Page height
    pub page_height: f32,

    /// Distance from each page edge to the border rectangle
    pub border_inset: f32,

    /// Stroke width of the border rectangle
    pub border_line_width: f32,

    /// Standard font family for all text
    pub font_family: FontFamily,

    /// Title font size in points
    pub title_font_size: f32,

    /// Top edge of the title band
    pub title_y: f32,

    /// Height of the band the title is centered in
    pub title_band_height: f32,

    /// Where the photograph is drawn (stretched to fit)
    pub image_box: BoxRect,

    /// Left edge of the row block
    pub rows_x: f32,

    /// Top edge of the first row
    pub rows_y: f32,

    /// Width of the label column
    pub label_width: f32,

    /// Width of the value column
    pub value_width: f32,

    /// Height of one text line in a row
    pub line_height: f32,

    /// Extra space after each row
    pub row_gap: f32,

    /// Label and value font size in points
    pub body_font_size: f32,

    /// Horizontal padding inside each text cell
    pub cell_padding: f32,

    /// Flate-compress the page content stream
    pub compress: bool,
}

impl LayoutOptions {
    /// Create layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON. Missing keys take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Points per layout unit.
    pub fn scale(&self) -> f32 {
        self.unit.points()
    }

    /// Page size in points.
    pub fn page_size_points(&self) -> (f32, f32) {
        (self.page_width * self.scale(), self.page_height * self.scale())
    }

    /// Return the same physical layout expressed in another unit.
    pub fn converted_to(&self, unit: Unit) -> Self {
        let factor = self.unit.points() / unit.points();
        Self {
            unit,
            page_width: self.page_width * factor,
            page_height: self.page_height * factor,
            border_inset: self.border_inset * factor,
            border_line_width: self.border_line_width * factor,
            title_y: self.title_y * factor,
            title_band_height: self.title_band_height * factor,
            image_box: self.image_box.scaled(factor),
            rows_x: self.rows_x * factor,
            rows_y: self.rows_y * factor,
            label_width: self.label_width * factor,
            value_width: self.value_width * factor,
            line_height: self.line_height * factor,
            row_gap: self.row_gap * factor,
            cell_padding: self.cell_padding * factor,
            ..self.clone()
        }
    }

    /// Set the page size.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set the border inset.
    pub fn with_border_inset(mut self, inset: f32) -> Self {
        self.border_inset = inset;
        self
    }

    /// Set the top edge of the title band.
    pub fn with_title_y(mut self, y: f32) -> Self {
        self.title_y = y;
        self
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    /// Set title and body font sizes in points.
    pub fn with_font_sizes(mut self, title: f32, body: f32) -> Self {
        self.title_font_size = title;
        self.body_font_size = body;
        self
    }

    /// Set the photograph box.
    pub fn with_image_box(mut self, image_box: BoxRect) -> Self {
        self.image_box = image_box;
        self
    }

    /// Set where the first row starts.
    pub fn with_rows_origin(mut self, x: f32, y: f32) -> Self {
        self.rows_x = x;
        self.rows_y = y;
        self
    }

    /// Set label and value column widths.
    pub fn with_columns(mut self, label_width: f32, value_width: f32) -> Self {
        self.label_width = label_width;
        self.value_width = value_width;
        self
    }

    /// Set the line height.
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    /// Set the gap after each row.
    pub fn with_row_gap(mut self, gap: f32) -> Self {
        self.row_gap = gap;
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Check that every constant describes a drawable page.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("title_font_size", self.title_font_size),
            ("title_band_height", self.title_band_height),
            ("label_width", self.label_width),
            ("value_width", self.value_width),
            ("line_height", self.line_height),
            ("body_font_size", self.body_font_size),
            ("image_box.width", self.image_box.width),
            ("image_box.height", self.image_box.height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidOptions(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("border_inset", self.border_inset),
            ("border_line_width", self.border_line_width),
            ("title_y", self.title_y),
            ("rows_x", self.rows_x),
            ("rows_y", self.rows_y),
            ("row_gap", self.row_gap),
            ("cell_padding", self.cell_padding),
            ("image_box.x", self.image_box.x),
            ("image_box.y", self.image_box.y),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidOptions(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        // Every length is drawn in points, so it must still be finite after scaling.
        let scale = self.scale();
        let lengths = positive
            .iter()
            .chain(non_negative.iter())
            .filter(|(name, _)| !name.ends_with("font_size"));
        for (name, value) in lengths {
            if !(value * scale).is_finite() {
                return Err(Error::InvalidOptions(format!(
                    "{} = {} overflows when converted to points",
                    name, value
                )));
            }
        }
        let (width_pt, height_pt) = self.page_size_points();
        if !(width_pt + height_pt).is_finite() {
            return Err(Error::InvalidOptions(
                "page size overflows when converted to points".to_string(),
            ));
        }

        if self.border_inset * 2.0 >= self.page_width.min(self.page_height) {
            return Err(Error::InvalidOptions(
                "border inset leaves no drawable area".to_string(),
            ));
        }

        if self.image_box.right() > self.page_width || self.image_box.bottom() > self.page_height {
            return Err(Error::InvalidOptions(
                "image box lies outside the page".to_string(),
            ));
        }

        if self.value_width <= self.cell_padding * 2.0 {
            return Err(Error::InvalidOptions(
                "value column is narrower than its padding".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            unit: Unit::Mm,
            page_width: 210.0,
            page_height: 297.0,
            border_inset: 10.0,
            border_line_width: 0.5,
            font_family: FontFamily::Helvetica,
            title_font_size: 18.0,
            title_y: 10.0,
            title_band_height: 15.0,
            image_box: BoxRect::new(160.0, 20.0, 30.0, 35.0),
            rows_x: 20.0,
            rows_y: 60.0,
            label_width: 65.0,
            value_width: 100.0,
            line_height: 9.0,
            row_gap: 1.0,
            body_font_size: 11.0,
            cell_padding: 1.0,
            compress: true,
        }
    }
}
