//! PNG export serializer.
//!
//! The restored image is always offered as PNG so the download is
//! lossless regardless of whether the upload was a JPEG.
//!
//! These are pure functions with no I/O; they return the encoded bytes.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use restora_pipeline::{BinaryMask, RgbImage};

/// File name offered for the restored image download.
pub const RESTORED_FILENAME: &str = "restored_image.png";

/// MIME type of every file this module produces.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Errors that can occur while serializing output.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The PNG encoder rejected the image.
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

/// Encode an RGB image as PNG bytes.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if encoding fails.
pub fn to_png(image: &RgbImage) -> Result<Vec<u8>, ExportError> {
    encode(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgb8)
}

/// Encode a binary mask as a single-channel PNG (0 keep, 255 restore).
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if encoding fails.
pub fn mask_to_png(mask: &BinaryMask) -> Result<Vec<u8>, ExportError> {
    let gray = mask.as_gray();
    encode(gray.as_raw(), gray.width(), gray.height(), ExtendedColorType::L8)
}

fn encode(
    raw: &[u8],
    width: u32,
    height: u32,
    color: ExtendedColorType,
) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(raw, width, height, color)?;
    Ok(buf)
}
