use std::path::PathBuf;

use restora_export::ExportError;
use restora_pipeline::PipelineError;

/// Everything that can stop a command-line restoration.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The TOML config file is malformed.
    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The strokes JSON file is malformed.
    #[error("invalid strokes file {}: {source}", path.display())]
    Strokes {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The mask image could not be decoded.
    #[error("invalid mask image {}: {source}", path.display())]
    Mask {
        path: PathBuf,
        source: image::ImageError,
    },

    /// A parameter is outside its accepted range.
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl CliError {
    /// Build an [`CliError::OutOfRange`] for `value` outside `(min, max)`.
    pub fn out_of_range<T: ToString>(name: &'static str, value: T, (min, max): (T, T)) -> Self {
        Self::OutOfRange {
            name,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}
