//! The single-pass layout engine.

use super::metrics::{sanitize, FontStyle};
use super::options::LayoutOptions;
use super::plan::{Element, LayoutReport, PagePlan, RowPlacement};
use super::wrap::wrap_text;
use crate::error::Result;
use crate::model::DocumentSpec;
use crate::photo::decode_photo;
use crate::writer::PdfWriter;

/// Outcome of a render pass: the finished PDF or the reason it failed.
pub type RenderResult = Result<Vec<u8>>;

/// Fraction of the font size between a cell's vertical center and the
/// text baseline.
const BASELINE_SHIFT: f32 = 0.3;

/// Finished PDF bytes together with the layout summary.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Complete single-page PDF
    pub bytes: Vec<u8>,
    /// Where each row was placed
    pub report: LayoutReport,
}

/// Lays out a [`DocumentSpec`] on one fixed page and serializes it.
///
/// The engine holds only immutable constants; every call owns its own
/// cursor, so one engine can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    options: LayoutOptions,
}

/// Maps layout units (origin top-left) to PDF points (origin bottom-left).
#[derive(Debug, Clone, Copy)]
struct Canvas {
    scale: f32,
    page_height: f32,
}

impl Canvas {
    fn x(&self, x: f32) -> f32 {
        x * self.scale
    }

    fn y(&self, y: f32) -> f32 {
        (self.page_height - y) * self.scale
    }

    fn len(&self, v: f32) -> f32 {
        v * self.scale
    }

    /// Baseline for text of `size` points centered in a cell starting at `top`.
    fn baseline(&self, top: f32, cell_height: f32, size: f32) -> f32 {
        self.y(top + cell_height / 2.0 + BASELINE_SHIFT * size / self.scale)
    }
}

impl LayoutEngine {
    /// Create an engine, rejecting inconsistent options.
    pub fn new(options: LayoutOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The constants this engine lays out with.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Render `spec` to PDF bytes.
    pub fn render(&self, spec: &DocumentSpec) -> RenderResult {
        Ok(self.render_with_report(spec)?.bytes)
    }

    /// Render `spec` and return the layout summary alongside the bytes.
    pub fn render_with_report(&self, spec: &DocumentSpec) -> Result<RenderedDocument> {
        let plan = self.plan(spec)?;
        let bytes = PdfWriter::new(self.options.compress).write(&plan)?;
        log::info!(
            "Rendered \"{}\": {} rows, {} value lines, {} bytes",
            plan.title,
            plan.report.row_count(),
            plan.report.line_count(),
            bytes.len()
        );
        Ok(RenderedDocument {
            bytes,
            report: plan.report,
        })
    }

    /// Lay out `spec` without serializing it.
    pub fn plan(&self, spec: &DocumentSpec) -> Result<PagePlan> {
        let o = &self.options;
        let canvas = Canvas {
            scale: o.scale(),
            page_height: o.page_height,
        };
        let (width, height) = o.page_size_points();

        // Decode first so a bad photo fails before any layout work.
        let image = spec.image.as_deref().map(decode_photo).transpose()?;

        let mut elements = Vec::with_capacity(2 + spec.fields.len() * 2);

        let inner_width = o.page_width - 2.0 * o.border_inset;
        let inner_height = o.page_height - 2.0 * o.border_inset;
        elements.push(Element::Rect {
            x: canvas.x(o.border_inset),
            y: canvas.y(o.border_inset + inner_height),
            width: canvas.len(inner_width),
            height: canvas.len(inner_height),
            line_width: canvas.len(o.border_line_width),
        });

        let title = single_line(&spec.title);
        if !title.is_empty() {
            let text_width =
                o.font_family
                    .text_width(FontStyle::Bold, o.title_font_size, &title);
            elements.push(Element::Text {
                style: FontStyle::Bold,
                size: o.title_font_size,
                x: canvas.x(o.border_inset) + (canvas.len(inner_width) - text_width) / 2.0,
                y: canvas.baseline(o.title_y, o.title_band_height, o.title_font_size),
                text: title.clone(),
            });
        }

        if image.is_some() {
            let b = o.image_box;
            elements.push(Element::Image {
                x: canvas.x(b.x),
                y: canvas.y(b.bottom()),
                width: canvas.len(b.width),
                height: canvas.len(b.height),
            });
        }

        let rows = self.place_rows(spec, canvas, &mut elements);

        let content_bottom = rows.last().map_or(o.rows_y, |r| r.bottom);
        let overflow = content_bottom > o.page_height - o.border_inset;
        if overflow {
            log::warn!(
                "Rows end at {:.1} but the border ends at {:.1}; content runs past the page frame",
                content_bottom,
                o.page_height - o.border_inset
            );
        }

        Ok(PagePlan {
            width,
            height,
            font_family: o.font_family,
            elements,
            image,
            title,
            report: LayoutReport {
                rows,
                content_bottom,
                overflow,
            },
        })
    }

    fn place_rows(
        &self,
        spec: &DocumentSpec,
        canvas: Canvas,
        elements: &mut Vec<Element>,
    ) -> Vec<RowPlacement> {
        let o = &self.options;
        let size = o.body_font_size;
        let label_x = canvas.x(o.rows_x + o.cell_padding);
        let value_x = canvas.x(o.rows_x + o.label_width + o.cell_padding);
        let wrap_width = canvas.len(o.value_width - 2.0 * o.cell_padding);

        let mut cursor = o.rows_y;
        let mut rows = Vec::with_capacity(spec.fields.len());

        for field in &spec.fields {
            let top = cursor;

            elements.push(Element::Text {
                style: FontStyle::Bold,
                size,
                x: label_x,
                y: canvas.baseline(top, o.line_height, size),
                text: format!("{}:", single_line(field.label())),
            });

            let lines = wrap_text(
                &sanitize(field.value()),
                wrap_width,
                o.font_family,
                FontStyle::Regular,
                size,
            );
            for (i, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let line_top = top + i as f32 * o.line_height;
                elements.push(Element::Text {
                    style: FontStyle::Regular,
                    size,
                    x: value_x,
                    y: canvas.baseline(line_top, o.line_height, size),
                    text: line.clone(),
                });
            }

            let bottom = top + lines.len() as f32 * o.line_height;
            log::debug!(
                "Row {:?}: {} line(s) from {:.1} to {:.1}",
                field.label(),
                lines.len(),
                top,
                bottom
            );
            rows.push(RowPlacement {
                label: field.label().to_string(),
                top,
                bottom,
                line_count: lines.len(),
            });
            cursor = bottom + o.row_gap;
        }

        rows
    }
}

/// Sanitize text that must stay on one line (title, labels).
fn single_line(text: &str) -> String {
    sanitize(text).replace('\n', " ").trim().to_string()
}
