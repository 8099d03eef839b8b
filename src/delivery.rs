//! Handing finished documents to the user.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{Error, Result};

/// File name used when the caller does not pick one.
pub const DEFAULT_FILENAME: &str = "generated_cv.pdf";

/// Content type advertised for downloads.
pub const CONTENT_TYPE: &str = "application/octet-stream";

/// A finished document ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested file name
    pub filename: String,
    /// MIME type for the response or link
    pub content_type: String,
    /// Document bytes
    pub bytes: Vec<u8>,
}

impl Download {
    /// Wrap document bytes with the default name and content type.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
            content_type: CONTENT_TYPE.to_string(),
            bytes,
        }
    }

    /// Use a different file name. Path components are stripped.
    pub fn with_filename(mut self, filename: impl AsRef<str>) -> Result<Self> {
        let name = Path::new(filename.as_ref())
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::validation("filename", "must name a file"))?;
        self.filename = name.to_string();
        Ok(self)
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether there are no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:` URI carrying the whole document.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }

    /// HTML anchor that downloads the document when clicked.
    pub fn html_link(&self, text: &str) -> String {
        format!(
            "<a href=\"{}\" download=\"{}\">{}</a>",
            self.data_uri(),
            escape_html(&self.filename),
            escape_html(text)
        )
    }

    /// Write the document into `dir` under its file name.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        log::info!("Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let download = Download::new(b"%PDF-1.5".to_vec());
        assert_eq!(download.filename, "generated_cv.pdf");
        assert_eq!(download.content_type, "application/octet-stream");
        assert_eq!(download.len(), 8);
    }

    #[test]
    fn test_data_uri() {
        let download = Download::new(b"hello".to_vec());
        assert_eq!(
            download.data_uri(),
            "data:application/octet-stream;base64,aGVsbG8="
        );
    }

    #[test]
    fn test_html_link_escapes() {
        let download = Download::new(vec![1, 2, 3])
            .with_filename("a\"b.pdf")
            .unwrap();
        let link = download.html_link("Download <CV>");
        assert!(link.starts_with("<a href=\"data:application/octet-stream;base64,AQID\""));
        assert!(link.contains("download=\"a&quot;b.pdf\""));
        assert!(link.ends_with(">Download &lt;CV&gt;</a>"));
    }

    #[test]
    fn test_filename_strips_directories() {
        let download = Download::new(vec![])
            .with_filename("../../etc/profile.pdf")
            .unwrap();
        assert_eq!(download.filename, "profile.pdf");
        assert!(Download::new(vec![]).with_filename("   ").is_err());
        assert!(Download::new(vec![]).with_filename("..").is_err());
    }
}
