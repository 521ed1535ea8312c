//! Parameter resolution for the command line.
//!
//! Values come from three layers, weakest first: built-in defaults, an
//! optional TOML config file, and explicit flags. Out-of-range values
//! are rejected rather than clamped so a typo never silently changes the
//! result.
//!
//! ```toml
//! [enhance]
//! brightness = 1.2
//! sharpness = 2.0
//!
//! [brush]
//! stroke_width = 8
//! stroke_color = "#ff0000"
//!
//! [inpaint]
//! radius = 3
//! ```

use std::path::Path;

use restora_pipeline::{BrushSettings, EnhanceParams, InpaintConfig, StrokeColor};
use serde::Deserialize;

use crate::error::CliError;

/// Largest inpainting radius accepted from the command line.
pub const MAX_RADIUS: u32 = 100;

/// Contents of a `--config` TOML file. Missing tables and keys fall back
/// to their defaults.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub enhance: EnhanceParams,
    pub brush: BrushSettings,
    pub inpaint: InpaintConfig,
}

impl FileConfig {
    /// Read and parse a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Read`] if the file cannot be read, or
    /// [`CliError::Config`] if it is not a valid config.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Overrides {
    pub brightness: Option<f32>,
    pub contrast: Option<f32>,
    pub sharpness: Option<f32>,
    pub stroke_width: Option<u32>,
    pub stroke_color: Option<StrokeColor>,
    pub radius: Option<u32>,
}

/// Fully resolved and validated parameters for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub enhance: EnhanceParams,
    pub brush: BrushSettings,
    pub inpaint: InpaintConfig,
}

impl Settings {
    /// Layer `overrides` on top of `file` and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::OutOfRange`] for the first value outside its
    /// accepted range.
    pub fn resolve(file: FileConfig, overrides: &Overrides) -> Result<Self, CliError> {
        let FileConfig {
            mut enhance,
            mut brush,
            mut inpaint,
        } = file;

        if let Some(v) = overrides.brightness {
            enhance.brightness = v;
        }
        if let Some(v) = overrides.contrast {
            enhance.contrast = v;
        }
        if let Some(v) = overrides.sharpness {
            enhance.sharpness = v;
        }
        if let Some(v) = overrides.stroke_width {
            brush.stroke_width = v;
        }
        if let Some(v) = overrides.stroke_color {
            brush.stroke_color = v;
        }
        if let Some(v) = overrides.radius {
            inpaint.radius = v;
        }

        let settings = Self {
            enhance,
            brush,
            inpaint,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), CliError> {
        check("brightness", self.enhance.brightness, EnhanceParams::BRIGHTNESS_RANGE)?;
        check("contrast", self.enhance.contrast, EnhanceParams::CONTRAST_RANGE)?;
        check("sharpness", self.enhance.sharpness, EnhanceParams::SHARPNESS_RANGE)?;
        check(
            "stroke width",
            self.brush.stroke_width,
            BrushSettings::STROKE_WIDTH_RANGE,
        )?;
        check("radius", self.inpaint.radius, (1, MAX_RADIUS))
    }
}

fn check<T: PartialOrd + ToString>(
    name: &'static str,
    value: T,
    (min, max): (T, T),
) -> Result<(), CliError> {
    // Written so NaN fails.
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(CliError::out_of_range(name, value, (min, max)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_flags() {
        let s = Settings::resolve(FileConfig::default(), &Overrides::default()).unwrap();
        assert_eq!(s.enhance, EnhanceParams::default());
        assert_eq!(s.brush, BrushSettings::default());
        assert_eq!(s.inpaint.radius, InpaintConfig::DEFAULT_RADIUS);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let file: FileConfig = toml::from_str(
            r##"
            [enhance]
            sharpness = 2.5

            [brush]
            stroke_color = "#f00"
            "##,
        )
        .unwrap();
        assert_eq!(file.enhance.sharpness, 2.5);
        assert_eq!(file.enhance.brightness, 1.0);
        assert_eq!(file.brush.stroke_color, StrokeColor([255, 0, 0]));
        assert_eq!(file.brush.stroke_width, BrushSettings::DEFAULT_STROKE_WIDTH);
        assert_eq!(file.inpaint, InpaintConfig::default());
    }

    #[test]
    fn unknown_table_is_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[colour]\nhue = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn bad_color_in_toml_is_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[brush]\nstroke_color = \"white\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_file() {
        let file = FileConfig {
            enhance: EnhanceParams {
                brightness: 1.5,
                contrast: 1.5,
                ..EnhanceParams::default()
            },
            ..FileConfig::default()
        };
        let overrides = Overrides {
            brightness: Some(0.8),
            radius: Some(7),
            ..Overrides::default()
        };
        let s = Settings::resolve(file, &overrides).unwrap();
        assert_eq!(s.enhance.brightness, 0.8);
        assert_eq!(s.enhance.contrast, 1.5);
        assert_eq!(s.inpaint.radius, 7);
    }

    #[test]
    fn range_endpoints_are_accepted() {
        let overrides = Overrides {
            brightness: Some(2.0),
            contrast: Some(0.5),
            sharpness: Some(3.0),
            stroke_width: Some(30),
            radius: Some(1),
            ..Overrides::default()
        };
        assert!(Settings::resolve(FileConfig::default(), &overrides).is_ok());
    }

    #[test]
    fn out_of_range_flag_is_rejected() {
        let overrides = Overrides {
            sharpness: Some(3.5),
            ..Overrides::default()
        };
        let err = Settings::resolve(FileConfig::default(), &overrides).unwrap_err();
        assert_eq!(err.to_string(), "sharpness must be between 0.5 and 3, got 3.5");
    }

    #[test]
    fn out_of_range_file_value_is_rejected() {
        let file = FileConfig {
            brush: BrushSettings {
                stroke_width: 0,
                ..BrushSettings::default()
            },
            ..FileConfig::default()
        };
        let err = Settings::resolve(file, &Overrides::default()).unwrap_err();
        assert!(matches!(
            err,
            CliError::OutOfRange {
                name: "stroke width",
                ..
            }
        ));
    }

    #[test]
    fn nan_is_rejected() {
        let overrides = Overrides {
            contrast: Some(f32::NAN),
            ..Overrides::default()
        };
        assert!(Settings::resolve(FileConfig::default(), &overrides).is_err());
    }

    #[test]
    fn zero_radius_is_rejected() {
        let overrides = Overrides {
            radius: Some(0),
            ..Overrides::default()
        };
        assert!(Settings::resolve(FileConfig::default(), &overrides).is_err());
    }
}
