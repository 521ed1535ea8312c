//! Upload decoding.
//!
//! Accepts raw uploaded bytes and produces the RGB source image the rest
//! of the pipeline works on. Only PNG and JPEG are accepted; the format is
//! sniffed from the content, never trusted from a filename.
//!
//! This is the first step of every session: raw bytes in, `RgbImage` out.

use image::{ImageFormat, RgbImage};

use crate::types::PipelineError;

/// Formats accepted for upload.
pub const ACCEPTED_FORMATS: &[ImageFormat] = &[ImageFormat::Png, ImageFormat::Jpeg];

/// Decode uploaded image bytes and convert to 8-bit RGB.
///
/// Alpha is dropped and 16-bit or grayscale inputs are converted, so the
/// result is always width×height×3.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::UnsupportedFormat`] if the content is not a
/// recognizable PNG or JPEG.
/// Returns [`PipelineError::ImageDecode`] if the data is corrupt.
pub fn decode_upload(bytes: &[u8]) -> Result<RgbImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let format = image::guess_format(bytes)
        .map_err(|_| PipelineError::UnsupportedFormat("unrecognized data".to_owned()))?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(PipelineError::UnsupportedFormat(format!("{format:?}")));
    }

    let img = image::load_from_memory_with_format(bytes, format)?;
    let rgb = img.to_rgb8();
    tracing::debug!(
        format = ?format,
        width = rgb.width(),
        height = rgb.height(),
        "decoded upload"
    );
    Ok(rgb)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn encode_png(img: &image::RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn empty_input_returns_error() {
        let result = decode_upload(&[]);
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn text_file_is_rejected() {
        let result = decode_upload(b"this is definitely not an image\n");
        assert!(matches!(result, Err(PipelineError::UnsupportedFormat(_))));
    }

    #[test]
    fn gif_is_rejected_by_content() {
        let gif_header = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
        let err = decode_upload(gif_header).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat(ref f) if f == "Gif"));
        assert!(err.is_invalid_upload());
    }

    #[test]
    fn truncated_png_is_decode_error() {
        let png = encode_png(&image::RgbaImage::new(4, 4));
        let result = decode_upload(&png[..png.len() / 2]);
        assert!(matches!(result, Err(PipelineError::ImageDecode(_))));
    }

    #[test]
    fn png_decodes_and_drops_alpha() {
        let img = image::RgbaImage::from_fn(3, 2, |_, _| image::Rgba([10, 20, 30, 0]));
        let rgb = decode_upload(&encode_png(&img)).unwrap();
        assert_eq!(rgb.dimensions(), (3, 2));
        for pixel in rgb.pixels() {
            assert_eq!(pixel.0, [10, 20, 30]);
        }
    }

    #[test]
    fn jpeg_decodes_with_matching_dimensions() {
        let img = RgbImage::from_fn(17, 31, |_, _| image::Rgb([128, 64, 32]));
        let mut buf = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, 95)
            .encode_image(&img)
            .unwrap();

        let rgb = decode_upload(&buf).unwrap();
        assert_eq!(rgb.dimensions(), (17, 31));
    }
}
