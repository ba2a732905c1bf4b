//! The postcard pipeline: one photo in, one finished postcard out.
//!
//! Stages run synchronously, each completing on the shared canvas before the
//! next begins:
//!
//! ```text
//! tonemap → load → crop → assemble → shadow → caption → finalize
//! ```
//!
//! Nothing persists between runs; every entity lives inside a single
//! [`run`] invocation, and the destination file is written only after the
//! full canvas is finalized.

use crate::caption::{self, CaptionReport, FontError};
use crate::compose::{self, BorderSpec, ComposeError, CropRegion, OutputTarget, ShadowSpec};
use crate::config::PostcardConfig;
use crate::finalize::{self, FinalizeError, FinalizeReport};
use crate::tonemap::{self, ToneMapError};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("input image not found: {0}")]
    InputMissing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error(transparent)]
    ToneMap(#[from] ToneMapError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Font(#[from] FontError),
    #[error(transparent)]
    Finalize(#[from] FinalizeError),
}

/// What one run produced, for the CLI summary.
#[derive(Debug)]
pub struct RunSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Source dimensions after orientation, before cropping.
    pub source: (u32, u32),
    pub crop: CropRegion,
    pub canvas: (u32, u32),
    pub margin_px: u32,
    pub dpi: u32,
    pub tonemapped: bool,
    pub shadow_applied: bool,
    pub caption: Option<CaptionReport>,
    pub finalize: FinalizeReport,
}

/// Run the full pipeline for `input` under `config`.
///
/// `skip_tonemap` is the CLI escape hatch for sources that are already sRGB
/// (or hosts without the configured tool).
pub fn run(
    config: &PostcardConfig,
    input: &Path,
    skip_tonemap: bool,
) -> Result<RunSummary, PipelineError> {
    if !input.exists() {
        return Err(PipelineError::InputMissing(input.to_path_buf()));
    }

    // Tone-map into a scratch file, or read the source directly
    let tonemapping = config.tonemap.enabled && !skip_tonemap;
    let scratch;
    let decode_path = if tonemapping {
        scratch = tempfile::Builder::new()
            .prefix(".cardstock-srgb-")
            .suffix(".png")
            .tempfile()?;
        tonemap::tone_map(&config.tonemap.tool, &config.tonemap.profile, input, scratch.path())?;
        scratch.path().to_path_buf()
    } else {
        input.to_path_buf()
    };

    let (image, icc) = load_oriented(&decode_path)?;
    let source = (image.width(), image.height());

    let target = OutputTarget {
        width_in: config.output.width_in,
        height_in: config.output.height_in,
        dpi: config.output.dpi,
        mode: config.output.mode,
    };
    let border = BorderSpec {
        color: config.border.color,
        width_in: config.border.width_in,
    };

    let (cropped, crop) = compose::crop_to_ratio(&image, target.ratio())?;
    let mut assembled = compose::assemble(&cropped, &border, &target)?;
    drop(cropped);

    let shadow = ShadowSpec {
        color: config.shadow.color,
        opacity: config.shadow.opacity,
        height_frac: config.shadow.height_frac,
    };
    let shadow_applied = config.shadow.enabled && !shadow.is_noop();
    if config.shadow.enabled {
        compose::apply_shadow(&mut assembled.canvas, assembled.margin_px, &shadow);
    }

    let caption_spec = config.caption.to_spec();
    let caption = caption::render_caption(&mut assembled.canvas, &caption_spec, assembled.margin_px)?;

    let finalize = finalize::save(
        &assembled.canvas,
        &config.output.path,
        assembled.dpi,
        icc.as_deref(),
    )?;

    Ok(RunSummary {
        input: input.to_path_buf(),
        output: config.output.path.clone(),
        source,
        crop,
        canvas: assembled.canvas.dimensions(),
        margin_px: assembled.margin_px,
        dpi: assembled.dpi,
        tonemapped: tonemapping,
        shadow_applied,
        caption,
        finalize,
    })
}

/// Decode an image, applying its EXIF orientation and extracting the ICC
/// profile for carry-over into the output.
fn load_oriented(path: &Path) -> Result<(DynamicImage, Option<Vec<u8>>), PipelineError> {
    let mut decoder = ImageReader::open(path)?.with_guessed_format()?.into_decoder()?;
    let icc = decoder.icc_profile().unwrap_or(None);
    let orientation = decoder
        .orientation()
        .unwrap_or(Orientation::NoTransforms);
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok((image, icc))
}
