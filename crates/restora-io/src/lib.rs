//! restora-io: Browser I/O and Dioxus component library.
//!
//! Handles file uploads, Blob downloads, raster image display, and
//! provides the reusable UI components of the restora web application:
//! upload zone, enhancement and brush controls, the mask drawing surface,
//! the side-by-side comparison, and the export panel.

pub mod components;
pub mod download;
pub mod raster;

pub use components::{
    BrushControls, ComparisonView, EnhanceControls, ExportPanel, FileUpload, ImageView, MaskCanvas,
};
