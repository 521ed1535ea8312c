//! restora: restore a damaged image from the command line.
//!
//! Runs the same enhance, mask, and inpaint steps as the web app. The
//! damaged region comes either from a painted mask image or from a JSON
//! list of strokes drawn with the brush flags.
//!
//! # Usage
//!
//! ```text
//! restora photo.jpg --mask scratches.png --sharpness 1.5 -o restored.png
//! restora photo.jpg --strokes strokes.json --stroke-width 8 --comparison side.png
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod error;
mod input;
mod output;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser};
use restora_pipeline::{Restoration, StrokeColor};

use crate::error::CliError;
use crate::settings::{FileConfig, Overrides, Settings};

/// Restore the damaged parts of a photo.
///
/// Enhances the input, inpaints the masked region, and writes the result
/// as a PNG.
#[derive(Parser)]
#[command(name = "restora", version)]
struct Cli {
    /// Path to the damaged image (PNG or JPEG).
    input: PathBuf,

    #[command(flatten)]
    mask: MaskSource,

    /// Brightness factor (0.5-2.0).
    #[arg(long)]
    brightness: Option<f32>,

    /// Contrast factor (0.5-2.0).
    #[arg(long)]
    contrast: Option<f32>,

    /// Sharpness factor (0.5-3.0).
    #[arg(long)]
    sharpness: Option<f32>,

    /// Stroke width in pixels for --strokes (1-30).
    #[arg(long)]
    stroke_width: Option<u32>,

    /// Stroke color for --strokes, as `#rgb` or `#rrggbb`.
    #[arg(long, value_parser = parse_stroke_color)]
    stroke_color: Option<StrokeColor>,

    /// Inpainting neighborhood radius in pixels.
    #[arg(long)]
    radius: Option<u32>,

    /// TOML file with `[enhance]`, `[brush]`, and `[inpaint]` tables.
    /// Flags take precedence over its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the restored PNG.
    #[arg(short, long, default_value = restora_export::RESTORED_FILENAME)]
    output: PathBuf,

    /// Also write a side-by-side comparison PNG.
    #[arg(long)]
    comparison: Option<PathBuf>,

    /// Also write the binary mask that was used as a PNG.
    #[arg(long)]
    save_mask: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Where the damaged region comes from. Exactly one is required.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct MaskSource {
    /// Painted mask image, same size as the input. Any non-black pixel
    /// marks damage.
    #[arg(long)]
    mask: Option<PathBuf>,

    /// JSON strokes file: `[[[x, y], ...], ...]`, one point list per
    /// stroke, drawn with the brush flags.
    #[arg(long)]
    strokes: Option<PathBuf>,
}

impl Cli {
    const fn overrides(&self) -> Overrides {
        Overrides {
            brightness: self.brightness,
            contrast: self.contrast,
            sharpness: self.sharpness,
            stroke_width: self.stroke_width,
            stroke_color: self.stroke_color,
            radius: self.radius,
        }
    }
}

fn parse_stroke_color(s: &str) -> Result<StrokeColor, String> {
    StrokeColor::from_hex(s).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "run failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(file, &cli.overrides())?;
    tracing::info!(?settings, "resolved settings");

    let bytes = input::read(&cli.input)?;
    let image = restora_pipeline::decode_upload(&bytes)?;
    tracing::info!(
        path = %cli.input.display(),
        width = image.width(),
        height = image.height(),
        "decoded input"
    );

    let enhanced = restora_pipeline::enhance(&image, &settings.enhance);
    let restoration = restore(cli, &settings, &enhanced)?;

    if restoration.mask.is_empty() {
        tracing::warn!("mask has no painted pixels; output is the enhanced input");
    } else {
        tracing::info!(painted = restoration.mask.painted_count(), "restored");
    }

    write_outputs(cli, &restoration)
}

fn restore(
    cli: &Cli,
    settings: &Settings,
    enhanced: &restora_pipeline::RgbImage,
) -> Result<Restoration, CliError> {
    let restoration = match (&cli.mask.mask, &cli.mask.strokes) {
        (Some(path), _) => {
            let overlay = input::load_mask(path)?;
            restora_pipeline::restore(enhanced, Some(&overlay), &settings.inpaint)?
        }
        (None, Some(path)) => {
            let strokes = input::load_strokes(path, settings.brush)?;
            restora_pipeline::restore_strokes(enhanced, &strokes, &settings.inpaint)?
        }
        (None, None) => return Err(restora_pipeline::PipelineError::MissingMask.into()),
    };
    Ok(restoration)
}

fn write_outputs(cli: &Cli, restoration: &Restoration) -> Result<(), CliError> {
    let png = restora_export::to_png(&restoration.restored)?;
    output::write_atomic(&cli.output, &png)?;
    println!("{}", cli.output.display());

    if let Some(ref path) = cli.comparison {
        let sheet = restora_export::side_by_side(
            &restoration.original,
            &restoration.restored,
            restora_export::DEFAULT_GAP,
        );
        output::write_atomic(path, &restora_export::to_png(&sheet)?)?;
        println!("{}", path.display());
    }

    if let Some(ref path) = cli.save_mask {
        output::write_atomic(path, &restora_export::mask_to_png(&restoration.mask)?)?;
        println!("{}", path.display());
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn output_defaults_to_restored_filename() {
        let cli = Cli::try_parse_from(["restora", "in.jpg", "--mask", "m.png"]).unwrap();
        assert_eq!(cli.output, PathBuf::from("restored_image.png"));
        assert_eq!(cli.overrides(), Overrides::default());
    }

    #[test]
    fn mask_source_is_required() {
        assert!(Cli::try_parse_from(["restora", "in.jpg"]).is_err());
    }

    #[test]
    fn mask_and_strokes_conflict() {
        let result =
            Cli::try_parse_from(["restora", "in.jpg", "--mask", "m.png", "--strokes", "s.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "restora",
            "in.jpg",
            "--strokes",
            "s.json",
            "--brightness",
            "1.25",
            "--stroke-width",
            "9",
            "--stroke-color",
            "#0f0",
            "-vv",
        ])
        .unwrap();
        let o = cli.overrides();
        assert_eq!(o.brightness, Some(1.25));
        assert_eq!(o.stroke_width, Some(9));
        assert_eq!(o.stroke_color, Some(StrokeColor([0, 255, 0])));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn bad_stroke_color_is_a_parse_error() {
        let result = Cli::try_parse_from([
            "restora",
            "in.jpg",
            "--strokes",
            "s.json",
            "--stroke-color",
            "red",
        ]);
        assert!(result.is_err());
    }
}
