//! Reading the image, mask, and strokes files.

use std::path::Path;

use restora_pipeline::{BrushSettings, Point, RgbaImage, Stroke};

use crate::error::CliError;

/// Read a whole file into memory.
///
/// # Errors
///
/// Returns [`CliError::Read`] if the file cannot be read.
pub fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a painted mask image as an RGBA overlay.
///
/// Any image the `image` crate can decode is accepted. Grayscale masks
/// keep their values, so black stays unpainted and anything brighter is
/// painted once binarized.
///
/// # Errors
///
/// Returns [`CliError::Read`] if the file cannot be read, or
/// [`CliError::Mask`] if it is not a decodable image.
pub fn load_mask(path: &Path) -> Result<RgbaImage, CliError> {
    let bytes = read(path)?;
    let img = image::load_from_memory(&bytes).map_err(|source| CliError::Mask {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Load strokes from a JSON file and draw them all with `brush`.
///
/// # Errors
///
/// Returns [`CliError::Read`] if the file cannot be read, or
/// [`CliError::Strokes`] if it is not a list of point lists.
pub fn load_strokes(path: &Path, brush: BrushSettings) -> Result<Vec<Stroke>, CliError> {
    let bytes = read(path)?;
    parse_strokes(&bytes, brush).map_err(|source| CliError::Strokes {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse `[[[x, y], ...], ...]`: one array of `[x, y]` pairs per stroke,
/// in image pixel coordinates.
fn parse_strokes(json: &[u8], brush: BrushSettings) -> Result<Vec<Stroke>, serde_json::Error> {
    let raw: Vec<Vec<[f64; 2]>> = serde_json::from_slice(json)?;
    Ok(raw
        .into_iter()
        .map(|points| {
            let points = points.into_iter().map(|[x, y]| Point::new(x, y)).collect();
            Stroke::with_points(points, brush)
        })
        .collect())
}
