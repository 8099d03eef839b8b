//! Photograph decoding.
//!
//! Photos arrive as encoded bytes straight from the caller and are decoded
//! in memory; nothing is written to disk.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Accepted photo encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotoFormat {
    /// JPEG / JFIF
    Jpeg,
    /// Portable Network Graphics
    Png,
}

impl PhotoFormat {
    /// MIME type of the encoding.
    pub fn mime_type(self) -> &'static str {
        match self {
            PhotoFormat::Jpeg => "image/jpeg",
            PhotoFormat::Png => "image/png",
        }
    }
}

/// A decoded photo as 8-bit RGB pixels, alpha already flattened onto white.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Encoding the photo arrived in
    pub format: PhotoFormat,
    rgb: Vec<u8>,
}

impl RasterImage {
    /// Raw RGB samples, row-major.
    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    /// Zlib-compress the samples for a `FlateDecode` image stream.
    pub fn deflate(&self) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&self.rgb)
            .map_err(|e| Error::Render(format!("image compression failed: {}", e)))?;
        encoder
            .finish()
            .map_err(|e| Error::Render(format!("image compression failed: {}", e)))
    }
}

/// Identify the photo encoding from its magic bytes.
pub fn detect_format(bytes: &[u8]) -> Result<PhotoFormat> {
    if bytes.is_empty() {
        return Err(Error::ImageDecode("image data is empty".to_string()));
    }
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => Ok(PhotoFormat::Jpeg),
        Ok(image::ImageFormat::Png) => Ok(PhotoFormat::Png),
        Ok(other) => Err(Error::ImageDecode(format!(
            "unsupported image format {:?} (expected JPEG or PNG)",
            other
        ))),
        Err(_) => Err(Error::ImageDecode(
            "unrecognized image data (expected JPEG or PNG)".to_string(),
        )),
    }
}

/// Decode a JPEG or PNG photo.
pub fn decode_photo(bytes: &[u8]) -> Result<RasterImage> {
    let format = detect_format(bytes)?;
    let image_format = match format {
        PhotoFormat::Jpeg => image::ImageFormat::Jpeg,
        PhotoFormat::Png => image::ImageFormat::Png,
    };

    let decoded = image::load_from_memory_with_format(bytes, image_format)?;

    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(Error::ImageDecode("image has no pixels".to_string()));
    }

    let rgb = if decoded.color().has_alpha() {
        flatten_on_white(&decoded.to_rgba8().into_raw())
    } else {
        decoded.to_rgb8().into_raw()
    };

    log::debug!(
        "Decoded {} photo {}x{} ({} bytes)",
        format.mime_type(),
        width,
        height,
        bytes.len()
    );

    Ok(RasterImage {
        width,
        height,
        format,
        rgb,
    })
}

fn flatten_on_white(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let alpha = u32::from(px[3]);
        for &channel in &px[..3] {
            let blended = (u32::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(img: image::DynamicImage, format: image::ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let img = image::RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]));
        let bytes = encode(image::DynamicImage::ImageRgb8(img), image::ImageFormat::Png);

        let photo = decode_photo(&bytes).unwrap();
        assert_eq!(photo.format, PhotoFormat::Png);
        assert_eq!((photo.width, photo.height), (4, 3));
        assert_eq!(photo.rgb().len(), 4 * 3 * 3);
        assert_eq!(&photo.rgb()[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_decode_jpeg() {
        let img = image::RgbImage::from_pixel(16, 16, image::Rgb([200, 200, 200]));
        let bytes = encode(image::DynamicImage::ImageRgb8(img), image::ImageFormat::Jpeg);

        let photo = decode_photo(&bytes).unwrap();
        assert_eq!(photo.format, PhotoFormat::Jpeg);
        assert_eq!((photo.width, photo.height), (16, 16));
    }

    #[test]
    fn test_transparent_pixels_become_white() {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 0]));
        let bytes = encode(image::DynamicImage::ImageRgba8(img), image::ImageFormat::Png);

        let photo = decode_photo(&bytes).unwrap();
        assert!(photo.rgb().iter().all(|&c| c == 255));
    }

    #[test]
    fn test_corrupt_data_rejected() {
        assert!(matches!(
            decode_photo(b"definitely not an image"),
            Err(Error::ImageDecode(_))
        ));
        assert!(matches!(decode_photo(&[]), Err(Error::ImageDecode(_))));
    }

    #[test]
    fn test_truncated_png_rejected() {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([1, 2, 3]));
        let bytes = encode(image::DynamicImage::ImageRgb8(img), image::ImageFormat::Png);
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(
            decode_photo(truncated),
            Err(Error::ImageDecode(_))
        ));
    }

    #[test]
    fn test_unsupported_format_rejected() {
        // GIF magic
        let result = detect_format(b"GIF89a\x01\x00\x01\x00");
        assert!(matches!(result, Err(Error::ImageDecode(_))));
    }

    #[test]
    fn test_deflate_is_zlib() {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([9, 9, 9]));
        let bytes = encode(image::DynamicImage::ImageRgb8(img), image::ImageFormat::Png);
        let compressed = decode_photo(&bytes).unwrap().deflate().unwrap();
        // zlib header with default compression
        assert_eq!(compressed[0], 0x78);
    }
}
