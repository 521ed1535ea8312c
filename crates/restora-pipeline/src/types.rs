//! Shared types for the restora image restoration pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Re-export `RgbImage` so downstream crates can reference source and
/// restored images without depending on `image` directly.
pub use image::RgbImage;

/// Re-export `RgbaImage` so downstream crates can reference mask
/// overlays without depending on `image` directly.
pub use image::RgbaImage;

/// Re-export `GrayImage` for single-channel rasters (luminance, masks).
pub use image::GrayImage;

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create dimensions from a width and height.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Dimensions of any `image` buffer.
    #[must_use]
    pub fn of<I: image::GenericImageView>(image: &I) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }

    /// Total number of pixels.
    #[must_use]
    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Brightness, contrast, and sharpness factors.
///
/// Each factor is a multiplicative blend weight relative to the image's
/// "degenerate" version (black, mean gray, smoothed). `1.0` leaves the
/// image unchanged.
///
/// Range checks are the caller's job: the UI sliders and the CLI keep
/// values inside [`Self::BRIGHTNESS_RANGE`] and friends, and
/// [`enhance`](crate::enhance::enhance) applies whatever it is given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceParams {
    /// Brightness factor. `0.5` halves every channel, `2.0` doubles it.
    pub brightness: f32,
    /// Contrast factor around the mean luminance.
    pub contrast: f32,
    /// Sharpness factor. Values below `1.0` blur, above sharpen.
    pub sharpness: f32,
}

impl EnhanceParams {
    /// Identity factor.
    pub const NEUTRAL: f32 = 1.0;

    /// Accepted brightness range.
    pub const BRIGHTNESS_RANGE: (f32, f32) = (0.5, 2.0);

    /// Accepted contrast range.
    pub const CONTRAST_RANGE: (f32, f32) = (0.5, 2.0);

    /// Accepted sharpness range.
    pub const SHARPNESS_RANGE: (f32, f32) = (0.5, 3.0);

    /// Returns a copy with every factor clamped into its accepted range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            brightness: self
                .brightness
                .clamp(Self::BRIGHTNESS_RANGE.0, Self::BRIGHTNESS_RANGE.1),
            contrast: self
                .contrast
                .clamp(Self::CONTRAST_RANGE.0, Self::CONTRAST_RANGE.1),
            sharpness: self
                .sharpness
                .clamp(Self::SHARPNESS_RANGE.0, Self::SHARPNESS_RANGE.1),
        }
    }

    /// Returns `true` when all three factors are exactly `1.0`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_identity(&self) -> bool {
        self.brightness == Self::NEUTRAL
            && self.contrast == Self::NEUTRAL
            && self.sharpness == Self::NEUTRAL
    }
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            brightness: Self::NEUTRAL,
            contrast: Self::NEUTRAL,
            sharpness: Self::NEUTRAL,
        }
    }
}

/// An opaque RGB brush color.
///
/// Serializes as a `#rrggbb` hex string so configuration files and the
/// browser color picker share one representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StrokeColor(pub [u8; 3]);

impl StrokeColor {
    /// White, the default brush color.
    pub const WHITE: Self = Self([255, 255, 255]);

    /// Parse a CSS hex color (`"#fff"` or `"#FFFFFF"`, surrounding
    /// whitespace ignored).
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the string is not a
    /// 3- or 6-digit hex color with a leading `#`.
    pub fn from_hex(s: &str) -> Result<Self, PipelineError> {
        let s = s.trim();
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| PipelineError::InvalidConfig(format!("not a hex color: {s:?}")))?;
        match hex.len() {
            3 => {
                // Short form: #rgb → #rrggbb
                let mut rgb = [0u8; 3];
                for (i, ch) in hex.chars().enumerate() {
                    let n = ch.to_digit(16).ok_or_else(|| {
                        PipelineError::InvalidConfig(format!("invalid hex digit {ch:?} in {s:?}"))
                    })?;
                    #[expect(clippy::cast_possible_truncation)]
                    {
                        rgb[i] = (n * 17) as u8;
                    }
                }
                Ok(Self(rgb))
            }
            6 if hex.is_ascii() => {
                let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16);
                match (channel(0..2), channel(2..4), channel(4..6)) {
                    (Ok(r), Ok(g), Ok(b)) => Ok(Self([r, g, b])),
                    _ => Err(PipelineError::InvalidConfig(format!(
                        "invalid hex color: {s:?}"
                    ))),
                }
            }
            _ => Err(PipelineError::InvalidConfig(format!(
                "unexpected hex color length: {s:?}"
            ))),
        }
    }

    /// Format as a lowercase `#rrggbb` string.
    #[must_use]
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Rounded ITU-R 601 luminance of the color.
    ///
    /// A brush whose luminance is zero (pure black) paints strokes that
    /// binarize to "not painted".
    #[must_use]
    pub fn luminance(self) -> u8 {
        let [r, g, b] = self.0;
        crate::binarize::luma(r, g, b)
    }
}

impl Default for StrokeColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for StrokeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for StrokeColor {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<StrokeColor> for String {
    fn from(color: StrokeColor) -> Self {
        color.to_hex()
    }
}

/// Brush used for painting the damage mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    /// Stroke diameter in image pixels.
    pub stroke_width: u32,
    /// Stroke color.
    pub stroke_color: StrokeColor,
}

impl BrushSettings {
    /// Accepted stroke width range (inclusive).
    pub const STROKE_WIDTH_RANGE: (u32, u32) = (1, 30);

    /// Default stroke width.
    pub const DEFAULT_STROKE_WIDTH: u32 = 5;

    /// Returns a copy with the stroke width clamped into range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            stroke_width: self
                .stroke_width
                .clamp(Self::STROKE_WIDTH_RANGE.0, Self::STROKE_WIDTH_RANGE.1),
            ..self
        }
    }
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
            stroke_color: StrokeColor::WHITE,
        }
    }
}

/// One freehand gesture on the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Pointer positions in image pixel coordinates, in drawing order.
    pub points: Vec<Point>,
    /// Diameter the stroke was drawn with.
    pub width: u32,
    /// Color the stroke was drawn with.
    pub color: StrokeColor,
}

impl Stroke {
    /// Start a stroke at `start` using the given brush.
    #[must_use]
    pub fn begin(start: Point, brush: BrushSettings) -> Self {
        Self {
            points: vec![start],
            width: brush.stroke_width,
            color: brush.stroke_color,
        }
    }

    /// Build a stroke from a list of points and a brush.
    #[must_use]
    pub const fn with_points(points: Vec<Point>, brush: BrushSettings) -> Self {
        Self {
            points,
            width: brush.stroke_width,
            color: brush.stroke_color,
        }
    }

    /// Append a point unless it is within half a pixel of the last one.
    ///
    /// Returns `true` if the point was added.
    pub fn extend_to(&mut self, point: Point) -> bool {
        if self
            .points
            .last()
            .is_some_and(|last| last.distance_squared(point) < 0.25)
        {
            return false;
        }
        self.points.push(point);
        true
    }
}

/// Inpainting algorithm selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InpaintMethod {
    /// Fast marching method of Telea (2004).
    #[default]
    Telea,
}

/// Configuration for the restoration stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InpaintConfig {
    /// Neighborhood radius, in pixels, considered for each filled pixel.
    pub radius: u32,
    /// Which inpainting algorithm to run.
    pub method: InpaintMethod,
}

impl InpaintConfig {
    /// Default neighborhood radius.
    pub const DEFAULT_RADIUS: u32 = 3;
}

impl Default for InpaintConfig {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            method: InpaintMethod::Telea,
        }
    }
}

/// Result of one restore action.
///
/// Keeps the input image next to the output so the UI and CLI can show
/// them side by side without re-running anything.
#[derive(Debug, Clone)]
pub struct Restoration {
    /// The (enhanced) image that was restored.
    pub original: RgbImage,
    /// The binary mask that drove the restoration.
    pub mask: crate::binarize::BinaryMask,
    /// The restored image.
    pub restored: RgbImage,
}

impl Restoration {
    /// Dimensions shared by all three rasters.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.restored)
    }
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the uploaded image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The uploaded image bytes were empty.
    #[error("uploaded image data is empty")]
    EmptyInput,

    /// The uploaded file is not a PNG or JPEG image.
    #[error("unsupported image type: {0} (expected PNG or JPEG)")]
    UnsupportedFormat(String),

    /// Restore was requested before anything was drawn.
    #[error("no mask drawn: paint over the damaged areas before restoring")]
    MissingMask,

    /// The mask and image do not have the same size.
    #[error("mask is {mask} but image is {image}")]
    DimensionMismatch {
        /// Dimensions of the image being restored.
        image: Dimensions,
        /// Dimensions of the supplied mask or overlay.
        mask: Dimensions,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    /// Returns `true` for errors caused by the uploaded file itself.
    #[must_use]
    pub const fn is_invalid_upload(&self) -> bool {
        matches!(
            self,
            Self::ImageDecode(_) | Self::EmptyInput | Self::UnsupportedFormat(_)
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- StrokeColor ---

    #[test]
    fn hex_long_form() {
        assert_eq!(
            StrokeColor::from_hex("#FF8000").unwrap(),
            StrokeColor([255, 128, 0])
        );
    }

    #[test]
    fn hex_short_form_expands() {
        assert_eq!(
            StrokeColor::from_hex(" #fa0 ").unwrap(),
            StrokeColor([255, 170, 0])
        );
    }

    #[test]
    fn hex_requires_hash() {
        assert!(matches!(
            StrokeColor::from_hex("FFFFFF"),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn hex_rejects_bad_digits_and_lengths() {
        assert!(StrokeColor::from_hex("#GGGGGG").is_err());
        assert!(StrokeColor::from_hex("#ffff").is_err());
        assert!(StrokeColor::from_hex("#").is_err());
        assert!(StrokeColor::from_hex("#ééé").is_err());
    }

    #[test]
    fn hex_formats_lowercase() {
        assert_eq!(StrokeColor([255, 0, 171]).to_hex(), "#ff00ab");
        assert_eq!(StrokeColor::WHITE.to_string(), "#ffffff");
    }

    #[test]
    fn stroke_color_serializes_as_hex_string() {
        let json = serde_json::to_string(&StrokeColor([1, 2, 3])).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: StrokeColor = serde_json::from_str("\"#FFFFFF\"").unwrap();
        assert_eq!(back, StrokeColor::WHITE);
    }

    #[test]
    fn stroke_color_rejects_invalid_json() {
        let result: Result<StrokeColor, _> = serde_json::from_str("\"white\"");
        assert!(result.is_err());
    }

    #[test]
    fn black_has_zero_luminance() {
        assert_eq!(StrokeColor([0, 0, 0]).luminance(), 0);
        assert_eq!(StrokeColor::WHITE.luminance(), 255);
    }

    // --- EnhanceParams ---

    #[test]
    fn enhance_params_default_is_identity() {
        assert!(EnhanceParams::default().is_identity());
    }

    #[test]
    fn enhance_params_clamped() {
        let p = EnhanceParams {
            brightness: 0.1,
            contrast: 5.0,
            sharpness: 2.5,
        }
        .clamped();
        assert!((p.brightness - 0.5).abs() < f32::EPSILON);
        assert!((p.contrast - 2.0).abs() < f32::EPSILON);
        assert!((p.sharpness - 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn enhance_params_partial_json_uses_defaults() {
        let p: EnhanceParams = serde_json::from_str(r#"{"contrast": 1.5}"#).unwrap();
        assert!((p.brightness - 1.0).abs() < f32::EPSILON);
        assert!((p.contrast - 1.5).abs() < f32::EPSILON);
        assert!((p.sharpness - 1.0).abs() < f32::EPSILON);
    }

    // --- BrushSettings / Stroke ---

    #[test]
    fn brush_defaults() {
        let b = BrushSettings::default();
        assert_eq!(b.stroke_width, 5);
        assert_eq!(b.stroke_color, StrokeColor::WHITE);
    }

    #[test]
    fn brush_width_clamped() {
        let b = BrushSettings {
            stroke_width: 0,
            ..BrushSettings::default()
        };
        assert_eq!(b.clamped().stroke_width, 1);
        let b = BrushSettings {
            stroke_width: 99,
            ..BrushSettings::default()
        };
        assert_eq!(b.clamped().stroke_width, 30);
    }

    #[test]
    fn brush_json_roundtrip_uses_hex() {
        let b = BrushSettings {
            stroke_width: 12,
            stroke_color: StrokeColor([255, 0, 0]),
        };
        let json = serde_json::to_string(&b).unwrap();
        assert!(json.contains("\"#ff0000\""), "got {json}");
        let back: BrushSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn stroke_extend_skips_near_duplicates() {
        let mut s = Stroke::begin(Point::new(10.0, 10.0), BrushSettings::default());
        assert!(!s.extend_to(Point::new(10.2, 10.1)));
        assert!(s.extend_to(Point::new(11.0, 10.0)));
        assert_eq!(s.points.len(), 2);
        assert_eq!(s.width, 5);
    }

    // --- Dimensions / InpaintConfig / errors ---

    #[test]
    fn dimensions_display_and_area() {
        let d = Dimensions::new(640, 480);
        assert_eq!(d.to_string(), "640x480");
        assert_eq!(d.area(), 307_200);
        assert_eq!(Dimensions::of(&RgbImage::new(3, 7)), Dimensions::new(3, 7));
    }

    #[test]
    fn inpaint_config_default() {
        let c = InpaintConfig::default();
        assert_eq!(c.radius, 3);
        assert_eq!(c.method, InpaintMethod::Telea);
    }

    #[test]
    fn dimension_mismatch_message() {
        let err = PipelineError::DimensionMismatch {
            image: Dimensions::new(100, 100),
            mask: Dimensions::new(50, 40),
        };
        assert_eq!(err.to_string(), "mask is 50x40 but image is 100x100");
        assert!(!err.is_invalid_upload());
    }

    #[test]
    fn invalid_upload_grouping() {
        assert!(PipelineError::EmptyInput.is_invalid_upload());
        assert!(PipelineError::UnsupportedFormat("Gif".into()).is_invalid_upload());
        assert!(!PipelineError::MissingMask.is_invalid_upload());
    }
}
