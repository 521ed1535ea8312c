//! restora-export: Pure output serializers (sans-IO)
//!
//! Turns restoration results into bytes ready to download or write.
//! Currently supports lossless PNG for the restored image and the
//! binary mask, plus a side-by-side comparison raster.

pub mod comparison;
pub mod png;

pub use comparison::{DEFAULT_GAP, side_by_side};
pub use png::{ExportError, PNG_MIME_TYPE, RESTORED_FILENAME, mask_to_png, to_png};
