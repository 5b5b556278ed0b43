//! JPEG export of a rendered surface.

use core::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

/// Linear scale applied to the surface before encoding.
pub const EXPORT_SCALE: f32 = 0.5;
/// JPEG quality (0-100).
pub const EXPORT_JPEG_QUALITY: u8 = 92;
/// Conventional output file name.
pub const EXPORT_FILE_NAME: &str = "quotecard.jpg";

/// Failure while encoding or writing the exported image.
#[derive(Debug)]
pub enum ExportError {
    Encode(image::ImageError),
    Io(std::io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Encode(err) => write!(f, "jpeg encode failed: {err}"),
            ExportError::Io(err) => write!(f, "export write failed: {err}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Encode(err) => Some(err),
            ExportError::Io(err) => Some(err),
        }
    }
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        ExportError::Encode(err)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

/// Encode a surface as JPEG at [`EXPORT_SCALE`] and
/// [`EXPORT_JPEG_QUALITY`].
pub fn encode_jpeg(surface: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let width = ((surface.width() as f32 * EXPORT_SCALE).round() as u32).max(1);
    let height = ((surface.height() as f32 * EXPORT_SCALE).round() as u32).max(1);
    let scaled = image::imageops::resize(surface, width, height, FilterType::Triangle);
    let rgb = DynamicImage::ImageRgba8(scaled).to_rgb8();

    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), EXPORT_JPEG_QUALITY);
    encoder.encode_image(&rgb)?;
    Ok(bytes)
}

/// Encode and write to `dir` under [`EXPORT_FILE_NAME`]; returns the path.
pub fn write_jpeg(surface: &RgbaImage, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
    let path = dir.as_ref().join(EXPORT_FILE_NAME);
    let bytes = encode_jpeg(surface)?;
    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn encodes_half_scale_jpeg() {
        let surface = RgbaImage::from_pixel(64, 48, Rgba([120, 30, 30, 255]));
        let bytes = encode_jpeg(&surface).unwrap();
        // JPEG SOI marker.
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 32);
        assert_eq!(decoded.height(), 24);
    }

    #[test]
    fn tiny_surfaces_still_export() {
        let surface = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let bytes = encode_jpeg(&surface).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 1);
        assert_eq!(decoded.height(), 1);
    }
}
