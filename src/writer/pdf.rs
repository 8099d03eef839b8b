//! Serializes a [`PagePlan`] into a one-page PDF using lopdf.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use crate::error::{Error, Result};
use crate::layout::metrics::{encode_win_ansi, FontStyle};
use crate::layout::{Element, PagePlan};

/// PDF version written in the header.
pub const PDF_VERSION: &str = "1.5";

/// Resource name of the photograph XObject.
pub const IMAGE_RESOURCE: &str = "Im1";

const PRODUCER: &str = concat!("profilepdf ", env!("CARGO_PKG_VERSION"));

/// Writes page plans as PDF bytes.
///
/// Output carries no timestamps or random identifiers, so equal plans
/// produce equal bytes.
#[derive(Debug, Clone, Copy)]
pub struct PdfWriter {
    compress: bool,
}

impl PdfWriter {
    /// Create a writer; `compress` deflates the page content stream.
    pub fn new(compress: bool) -> Self {
        Self { compress }
    }

    /// Serialize `plan` into a complete document.
    pub fn write(&self, plan: &PagePlan) -> Result<Vec<u8>> {
        check_finite(plan)?;

        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for style in [FontStyle::Regular, FontStyle::Bold] {
            if !plan.uses_style(style) {
                continue;
            }
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => plan.font_family.base_font(style),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(style.resource_name(), font_id);
        }

        let mut resources = dictionary! {
            "Font" => fonts,
            "ProcSet" => vec!["PDF".into(), "Text".into(), "ImageC".into()],
        };

        if let Some(image) = &plan.image {
            let image_stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(image.width),
                    "Height" => i64::from(image.height),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                image.deflate()?,
            );
            let image_id = doc.add_object(image_stream);
            resources.set("XObject", dictionary! { IMAGE_RESOURCE => image_id });
        }

        let content = Content {
            operations: self.operations(plan),
        };
        let encoded = content
            .encode()
            .map_err(|e| Error::Render(format!("content stream encoding failed: {}", e)))?;
        let content_stream = if self.compress {
            Stream::new(dictionary! { "Filter" => "FlateDecode" }, deflate(&encoded)?)
        } else {
            Stream::new(Dictionary::new(), encoded)
        };
        let content_id = doc.add_object(content_stream);

        let resources_id = doc.add_object(resources);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), plan.width.into(), plan.height.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => text_string(&plan.title),
            "Producer" => Object::string_literal(PRODUCER),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| Error::Render(format!("failed to write PDF: {}", e)))?;
        Ok(bytes)
    }

    fn operations(&self, plan: &PagePlan) -> Vec<Operation> {
        let mut ops = Vec::new();
        for element in &plan.elements {
            match element {
                Element::Rect {
                    x,
                    y,
                    width,
                    height,
                    line_width,
                } => {
                    ops.push(Operation::new("w", vec![num(*line_width)]));
                    ops.push(Operation::new(
                        "re",
                        vec![num(*x), num(*y), num(*width), num(*height)],
                    ));
                    ops.push(Operation::new("S", vec![]));
                }
                Element::Text {
                    style,
                    size,
                    x,
                    y,
                    text,
                } => {
                    ops.push(Operation::new("BT", vec![]));
                    ops.push(Operation::new(
                        "Tf",
                        vec![style.resource_name().into(), num(*size)],
                    ));
                    ops.push(Operation::new("Td", vec![num(*x), num(*y)]));
                    ops.push(Operation::new(
                        "Tj",
                        vec![Object::string_literal(encode_win_ansi(text))],
                    ));
                    ops.push(Operation::new("ET", vec![]));
                }
                Element::Image {
                    x,
                    y,
                    width,
                    height,
                } => {
                    ops.push(Operation::new("q", vec![]));
                    ops.push(Operation::new(
                        "cm",
                        vec![
                            num(*width),
                            0.into(),
                            0.into(),
                            num(*height),
                            num(*x),
                            num(*y),
                        ],
                    ));
                    ops.push(Operation::new("Do", vec![IMAGE_RESOURCE.into()]));
                    ops.push(Operation::new("Q", vec![]));
                }
            }
        }
        ops
    }
}

/// Reject plans with coordinates no PDF reader can parse.
fn check_finite(plan: &PagePlan) -> Result<()> {
    let mut values = vec![plan.width, plan.height];
    for element in &plan.elements {
        match element {
            Element::Rect {
                x,
                y,
                width,
                height,
                line_width,
            } => values.extend([*x, *y, *width, *height, *line_width]),
            Element::Text { size, x, y, .. } => values.extend([*size, *x, *y]),
            Element::Image {
                x,
                y,
                width,
                height,
            } => values.extend([*x, *y, *width, *height]),
        }
    }
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::Render(
            "page geometry is not finite in points".to_string(),
        ))
    }
}

/// Encode a document-info text string: plain ASCII as a literal, anything
/// else as UTF-16BE with a byte order mark.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Round to hundredths of a point so coordinates print compactly.
fn num(value: f32) -> Object {
    ((value * 100.0).round() / 100.0).into()
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| Error::Render(format!("content compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| Error::Render(format!("content compression failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::metrics::FontFamily;
    use crate::layout::LayoutReport;

    fn plan_with(elements: Vec<Element>) -> PagePlan {
        PagePlan {
            width: 595.28,
            height: 841.89,
            font_family: FontFamily::Helvetica,
            elements,
            image: None,
            title: "Test".to_string(),
            report: LayoutReport::default(),
        }
    }

    #[test]
    fn test_writes_pdf_header_and_trailer() {
        let bytes = PdfWriter::new(true).write(&plan_with(vec![])).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(32)..]).to_string();
        assert!(tail.contains("%%EOF"));
    }

    #[test]
    fn test_uncompressed_content_is_readable() {
        let plan = plan_with(vec![Element::Text {
            style: FontStyle::Bold,
            size: 11.0,
            x: 60.0,
            y: 600.0,
            text: "Setter (Libero)".to_string(),
        }]);
        let bytes = PdfWriter::new(false).write(&plan).unwrap();
        let raw = String::from_utf8_lossy(&bytes);
        assert!(raw.contains("/F2"));
        assert!(raw.contains("Setter"));
        assert!(raw.contains("/Helvetica-Bold"));
    }

    #[test]
    fn test_only_used_fonts_are_declared() {
        let plan = plan_with(vec![Element::Text {
            style: FontStyle::Regular,
            size: 11.0,
            x: 60.0,
            y: 600.0,
            text: "Libero".to_string(),
        }]);
        let bytes = PdfWriter::new(false).write(&plan).unwrap();
        let raw = String::from_utf8_lossy(&bytes);
        assert!(raw.contains("/Helvetica"));
        assert!(!raw.contains("/Helvetica-Bold"));
    }

    #[test]
    fn test_num_rounds_to_hundredths() {
        match num(1.23456) {
            Object::Real(v) => assert!((v - 1.23).abs() < 1e-6),
            other => panic!("expected a real, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_geometry_is_a_render_error() {
        let mut plan = plan_with(vec![]);
        plan.height = f32::INFINITY;
        assert!(matches!(
            PdfWriter::new(true).write(&plan),
            Err(Error::Render(_))
        ));

        let plan = plan_with(vec![Element::Image {
            x: 10.0,
            y: f32::NAN,
            width: 5.0,
            height: 5.0,
        }]);
        assert!(PdfWriter::new(true).write(&plan).is_err());
    }

    #[test]
    fn test_info_title_is_utf16_when_not_ascii() {
        let mut plan = plan_with(vec![]);
        plan.title = "“Squad” – 2025".to_string();
        let bytes = PdfWriter::new(true).write(&plan).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_dictionary(info_id).unwrap();
        let raw = info.get(b"Title").unwrap().as_str().unwrap();
        assert_eq!(&raw[..2], &[0xFE, 0xFF]);

        let units: Vec<u16> = raw[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        assert_eq!(String::from_utf16(&units).unwrap(), "“Squad” – 2025");
    }

    #[test]
    fn test_ascii_title_stays_literal() {
        match text_string("Volleyball Player Profile") {
            Object::String(bytes, StringFormat::Literal) => {
                assert_eq!(bytes, b"Volleyball Player Profile")
            }
            other => panic!("expected a literal string, got {:?}", other),
        }
    }

    #[test]
    fn test_identical_plans_identical_bytes() {
        let plan = plan_with(vec![Element::Rect {
            x: 28.35,
            y: 28.35,
            width: 538.58,
            height: 785.2,
            line_width: 1.42,
        }]);
        let writer = PdfWriter::new(true);
        assert_eq!(writer.write(&plan).unwrap(), writer.write(&plan).unwrap());
    }
}
