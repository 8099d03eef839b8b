//! Read-back of generated PDFs.
//!
//! Loads a document with lopdf and walks the first page's content stream to
//! recover what was drawn: text runs with their positions, image draws and
//! rectangles. Only the operators the writer emits are interpreted.

use std::collections::HashMap;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::metrics::decode_win_ansi;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.5"

/// One `Tj`/`TJ` text draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// Decoded text
    pub text: String,
    /// Base font name (e.g. "Helvetica-Bold"), or the resource name if unresolved
    pub font: String,
    /// Font size in points
    pub size: f32,
    /// Baseline start, x
    pub x: f32,
    /// Baseline start, y (from the bottom of the page)
    pub y: f32,
}

impl TextRun {
    /// Whether the run uses a bold face.
    pub fn is_bold(&self) -> bool {
        self.font.contains("Bold")
    }
}

/// One image XObject draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDraw {
    /// XObject resource name
    pub name: String,
    /// Lower-left x
    pub x: f32,
    /// Lower-left y
    pub y: f32,
    /// Drawn width
    pub width: f32,
    /// Drawn height
    pub height: f32,
}

/// What a PDF contains, as far as this crate's output is concerned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Header version (e.g. "1.5")
    pub version: String,
    /// Number of pages in the page tree
    pub page_count: u32,
    /// First page width in points
    pub page_width: f32,
    /// First page height in points
    pub page_height: f32,
    /// Text runs on the first page, in drawing order
    pub text_runs: Vec<TextRun>,
    /// Image draws on the first page
    pub images: Vec<ImageDraw>,
    /// Number of rectangles on the first page
    pub rect_count: usize,
}

impl DocumentSummary {
    /// All text, one run per line, in drawing order.
    pub fn plain_text(&self) -> String {
        self.text_runs
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Index of the first run containing `needle`.
    pub fn position_of(&self, needle: &str) -> Option<usize> {
        self.text_runs.iter().position(|r| r.text.contains(needle))
    }

    /// Whether any run contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.position_of(needle).is_some()
    }
}

/// Read the version from a `%PDF-x.y` header.
pub fn detect_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::PdfParse("missing %PDF- header".to_string()));
    }
    let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();
    let chars: Vec<char> = version.chars().collect();
    if !(chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit())
    {
        return Err(Error::PdfParse(format!("invalid PDF version {:?}", version)));
    }
    Ok(version)
}

/// Inspect a PDF held in memory.
pub fn inspect_bytes(data: &[u8]) -> Result<DocumentSummary> {
    let version = detect_version(data)?;
    let doc = Document::load_mem(data)?;

    let pages = doc.get_pages();
    let page_count = pages.len() as u32;
    let Some((_, &page_id)) = pages.iter().next() else {
        return Err(Error::PdfParse("document has no pages".to_string()));
    };

    let page = doc.get_dictionary(page_id)?;
    let (page_width, page_height) = media_box(&doc, page)?;
    let fonts = font_names(&doc, page);

    let content = Content::decode(&doc.get_page_content(page_id)?)?;
    let mut walker = ContentWalker::new(&fonts);
    for op in &content.operations {
        walker.apply(&op.operator, &op.operands);
    }

    Ok(DocumentSummary {
        version,
        page_count,
        page_width,
        page_height,
        text_runs: walker.text_runs,
        images: walker.images,
        rect_count: walker.rect_count,
    })
}

/// Inspect a PDF file.
pub fn inspect_file<P: AsRef<Path>>(path: P) -> Result<DocumentSummary> {
    let data = std::fs::read(path)?;
    inspect_bytes(&data)
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn media_box(doc: &Document, page: &Dictionary) -> Result<(f32, f32)> {
    let values = page
        .get(b"MediaBox")
        .ok()
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| match obj {
            Object::Array(items) => Some(items.iter().filter_map(number).collect::<Vec<_>>()),
            _ => None,
        })
        .ok_or_else(|| Error::PdfParse("page has no MediaBox".to_string()))?;

    match values.as_slice() {
        [x0, y0, x1, y1] => Ok((x1 - x0, y1 - y0)),
        _ => Err(Error::PdfParse("malformed MediaBox".to_string())),
    }
}

/// Map font resource names to base font names for one page.
fn font_names(doc: &Document, page: &Dictionary) -> HashMap<Vec<u8>, String> {
    let mut names = HashMap::new();

    let font_dict = page
        .get(b"Resources")
        .ok()
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| match obj {
            Object::Dictionary(d) => d.get(b"Font").ok(),
            _ => None,
        })
        .and_then(|obj| resolve(doc, obj));

    if let Some(Object::Dictionary(fonts)) = font_dict {
        for (key, value) in fonts.iter() {
            let base = resolve(doc, value).and_then(|obj| match obj {
                Object::Dictionary(d) => match d.get(b"BaseFont") {
                    Ok(Object::Name(name)) => Some(String::from_utf8_lossy(name).to_string()),
                    _ => None,
                },
                _ => None,
            });
            if let Some(base) = base {
                names.insert(key.clone(), base);
            }
        }
    }

    names
}

/// Minimal text and graphics state for the operators the writer emits.
struct ContentWalker<'a> {
    fonts: &'a HashMap<Vec<u8>, String>,
    font: String,
    size: f32,
    line_x: f32,
    line_y: f32,
    ctm: [f32; 6],
    ctm_stack: Vec<[f32; 6]>,
    text_runs: Vec<TextRun>,
    images: Vec<ImageDraw>,
    rect_count: usize,
}

impl<'a> ContentWalker<'a> {
    fn new(fonts: &'a HashMap<Vec<u8>, String>) -> Self {
        Self {
            fonts,
            font: String::new(),
            size: 0.0,
            line_x: 0.0,
            line_y: 0.0,
            ctm: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            ctm_stack: Vec::new(),
            text_runs: Vec::new(),
            images: Vec::new(),
            rect_count: 0,
        }
    }

    fn apply(&mut self, operator: &str, operands: &[Object]) {
        let nums: Vec<f32> = operands.iter().filter_map(number).collect();
        match operator {
            "BT" => {
                self.line_x = 0.0;
                self.line_y = 0.0;
            }
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.font = self
                        .fonts
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                }
                if let Some(size) = operands.get(1).and_then(number) {
                    self.size = size;
                }
            }
            "Td" | "TD" if nums.len() == 2 => {
                self.line_x += nums[0];
                self.line_y += nums[1];
            }
            "Tm" if nums.len() == 6 => {
                self.line_x = nums[4];
                self.line_y = nums[5];
            }
            "Tj" | "'" | "\"" => {
                if let Some(Object::String(bytes, _)) = operands.last() {
                    self.push_text(decode_win_ansi(bytes));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let text: String = items
                        .iter()
                        .filter_map(|item| match item {
                            Object::String(bytes, _) => Some(decode_win_ansi(bytes)),
                            _ => None,
                        })
                        .collect();
                    self.push_text(text);
                }
            }
            "re" => self.rect_count += 1,
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.ctm_stack.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" if nums.len() == 6 => {
                self.ctm = [nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]];
            }
            "Do" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.images.push(ImageDraw {
                        name: String::from_utf8_lossy(name).to_string(),
                        x: self.ctm[4],
                        y: self.ctm[5],
                        width: self.ctm[0],
                        height: self.ctm[3],
                    });
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: String) {
        self.text_runs.push(TextRun {
            text,
            font: self.font.clone(),
            size: self.size,
            x: self.line_x,
            y: self.line_y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_version() {
        assert_eq!(detect_version(b"%PDF-1.7\n%\xe2\xe3").unwrap(), "1.7");
        assert_eq!(detect_version(b"%PDF-2.0\n").unwrap(), "2.0");
    }

    #[test]
    fn test_detect_rejects_non_pdf() {
        assert!(matches!(
            detect_version(b"<!DOCTYPE html>"),
            Err(Error::PdfParse(_))
        ));
        assert!(detect_version(b"%PDF").is_err());
        assert!(detect_version(b"%PDF-x.y").is_err());
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        assert!(inspect_bytes(b"not a pdf at all").is_err());
        assert!(inspect_bytes(b"%PDF-1.5\ntruncated").is_err());
    }

    #[test]
    fn test_walker_tracks_text_position() {
        let fonts: HashMap<Vec<u8>, String> =
            [(b"F2".to_vec(), "Helvetica-Bold".to_string())].into_iter().collect();
        let mut walker = ContentWalker::new(&fonts);
        walker.apply("BT", &[]);
        walker.apply("Tf", &["F2".into(), 11.into()]);
        walker.apply("Td", &[10.into(), 20.into()]);
        walker.apply("Tj", &[Object::string_literal("Email:")]);
        walker.apply("ET", &[]);

        let run = &walker.text_runs[0];
        assert_eq!(run.text, "Email:");
        assert_eq!(run.font, "Helvetica-Bold");
        assert!(run.is_bold());
        assert_eq!((run.x, run.y, run.size), (10.0, 20.0, 11.0));
    }

    #[test]
    fn test_walker_tracks_image_matrix() {
        let fonts = HashMap::new();
        let mut walker = ContentWalker::new(&fonts);
        walker.apply("q", &[]);
        walker.apply(
            "cm",
            &[85.into(), 0.into(), 0.into(), 99.into(), 453.into(), 663.into()],
        );
        walker.apply("Do", &["Im1".into()]);
        walker.apply("Q", &[]);

        assert_eq!(walker.images.len(), 1);
        assert_eq!(walker.images[0].width, 85.0);
        assert_eq!(walker.images[0].y, 663.0);
        assert_eq!(walker.ctm, [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }
}
