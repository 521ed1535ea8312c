//! Dioxus UI components for restora.
//!
//! Provides the file upload zone, enhancement and brush controls, the
//! mask drawing surface, the side-by-side comparison, and the export
//! panel.

mod brush_controls;
mod comparison;
mod enhance_controls;
mod export;
mod image_view;
mod mask_canvas;
mod slider;
mod upload;

pub use brush_controls::BrushControls;
pub use comparison::ComparisonView;
pub use enhance_controls::EnhanceControls;
pub use export::ExportPanel;
pub use image_view::ImageView;
pub use mask_canvas::MaskCanvas;
pub use mask_canvas::stroke_path_data;
pub use upload::FileUpload;
