//! Raster image encoding and Blob URL creation.
//!
//! Converts `RgbImage` data to browser-displayable Blob URLs by
//! encoding to PNG and creating object URLs via the Web API.

use restora_pipeline::RgbImage;
use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur during raster-to-Blob-URL conversion.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// PNG encoding failed.
    #[error(transparent)]
    Export(#[from] restora_export::ExportError),

    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for RasterError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Encode an `RgbImage` as a PNG Blob URL for use as an `<img src>`.
///
/// The returned URL must be revoked via [`revoke_blob_url`] when no
/// longer needed to avoid memory leaks.
///
/// # Errors
///
/// Returns [`RasterError::Export`] if PNG encoding fails.
/// Returns [`RasterError::JsError`] if Blob or URL creation fails.
pub fn rgb_image_to_blob_url(image: &RgbImage) -> Result<String, RasterError> {
    let png = restora_export::to_png(image)?;
    bytes_to_blob_url(&png, restora_export::PNG_MIME_TYPE)
}

/// Wrap raw bytes in a `Blob` of the given MIME type and return its
/// object URL.
///
/// # Errors
///
/// Returns [`RasterError::JsError`] if Blob or URL creation fails.
pub fn bytes_to_blob_url(bytes: &[u8], mime_type: &str) -> Result<String, RasterError> {
    let uint8_array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&uint8_array);

    let opts = BlobPropertyBag::new();
    opts.set_type(mime_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    Ok(url)
}

/// Revoke a Blob URL previously created by this module.
///
/// A failed revocation is a resource cleanup failure: it is logged and
/// otherwise ignored, since the page keeps working either way.
pub fn revoke_blob_url(url: &str) {
    if let Err(e) = web_sys::Url::revoke_object_url(url) {
        tracing::warn!(url, error = ?e, "failed to revoke blob URL");
    }
}
