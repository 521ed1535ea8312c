//! restora-pipeline: Pure image restoration pipeline (sans-IO).
//!
//! Takes an uploaded photo and a painted damage mask through:
//! decode -> enhance -> rasterize strokes -> binarize -> inpaint.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and image buffers. All browser/filesystem interaction
//! lives in `restora-io` and `restora-cli`.

pub mod binarize;
pub mod decode;
pub mod enhance;
pub mod inpaint;
pub mod overlay;
pub mod types;

pub use binarize::{BinaryMask, binarize, binarize_luma};
pub use decode::decode_upload;
pub use enhance::enhance;
pub use inpaint::inpaint;
pub use overlay::rasterize;
pub use types::{
    BrushSettings, Dimensions, EnhanceParams, InpaintConfig, InpaintMethod, PipelineError, Point,
    Restoration, RgbImage, RgbaImage, Stroke, StrokeColor,
};

/// Binarize a painted overlay and restore the masked region.
///
/// `enhanced` is the image as the user currently sees it, after
/// [`enhance`]. `overlay` is the drawing surface's RGBA buffer, or `None`
/// if the user never drew anything.
///
/// An overlay whose strokes all binarize to zero (for example a black
/// brush) yields a restoration identical to the input.
///
/// # Errors
///
/// Returns [`PipelineError::MissingMask`] if `overlay` is `None`.
/// Returns [`PipelineError::DimensionMismatch`] if the overlay is not the
/// same size as `enhanced`.
pub fn restore(
    enhanced: &RgbImage,
    overlay: Option<&RgbaImage>,
    config: &InpaintConfig,
) -> Result<Restoration, PipelineError> {
    let overlay = overlay.ok_or(PipelineError::MissingMask)?;
    check_dimensions(enhanced, overlay)?;
    restore_with_mask(enhanced, binarize(overlay), config)
}

/// Rasterize strokes at the image's size, then [`restore`].
///
/// # Errors
///
/// Returns [`PipelineError::MissingMask`] if `strokes` is empty.
pub fn restore_strokes(
    enhanced: &RgbImage,
    strokes: &[Stroke],
    config: &InpaintConfig,
) -> Result<Restoration, PipelineError> {
    if strokes.is_empty() {
        return Err(PipelineError::MissingMask);
    }
    let overlay = rasterize(strokes, Dimensions::of(enhanced));
    restore(enhanced, Some(&overlay), config)
}

/// Restore `enhanced` using an already-binarized mask.
///
/// # Errors
///
/// Returns [`PipelineError::DimensionMismatch`] if the mask is not the
/// same size as `enhanced`.
pub fn restore_with_mask(
    enhanced: &RgbImage,
    mask: BinaryMask,
    config: &InpaintConfig,
) -> Result<Restoration, PipelineError> {
    let restored = inpaint(enhanced, &mask, config)?;
    Ok(Restoration {
        original: enhanced.clone(),
        mask,
        restored,
    })
}

fn check_dimensions<I: image::GenericImageView>(
    image: &RgbImage,
    mask: &I,
) -> Result<(), PipelineError> {
    let image_dims = Dimensions::of(image);
    let mask_dims = Dimensions::of(mask);
    if image_dims == mask_dims {
        Ok(())
    } else {
        Err(PipelineError::DimensionMismatch {
            image: image_dims,
            mask: mask_dims,
        })
    }
}
