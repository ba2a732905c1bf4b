//! Output finalizer: encode, tag resolution metadata, persist atomically.
//!
//! The canvas is encoded into a temporary file next to the destination and
//! only renamed over it once everything succeeded, so a failed run never
//! leaves a half-composited artifact on disk. Resolution (DPI) tags and the
//! carried-over ICC profile are best-effort: an encoder or tagger that cannot
//! handle them downgrades the report instead of failing the run.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tiff::TiffEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinalizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("unsupported output extension `{0}` (use tif, png, or jpg)")]
    UnsupportedFormat(String),
}

/// What actually made it into the persisted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeReport {
    /// The ICC profile from the tone-mapped intermediate was embedded.
    pub icc_embedded: bool,
    /// X/Y resolution EXIF tags were written.
    pub dpi_tagged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Png,
    Jpeg,
    Tiff,
}

fn format_for(dest: &Path) -> Result<Format, FinalizeError> {
    let ext = dest
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok(Format::Png),
        "jpg" | "jpeg" => Ok(Format::Jpeg),
        "tif" | "tiff" => Ok(Format::Tiff),
        other => Err(FinalizeError::UnsupportedFormat(other.to_string())),
    }
}

/// Encode `canvas` to `dest` with `dpi` resolution tags and an optional ICC
/// profile.
pub fn save(
    canvas: &RgbImage,
    dest: &Path,
    dpi: u32,
    icc: Option<&[u8]>,
) -> Result<FinalizeReport, FinalizeError> {
    let format = format_for(dest)?;

    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let suffix = format!(
        ".{}",
        dest.extension().and_then(|e| e.to_str()).unwrap_or("img")
    );
    let mut temp = tempfile::Builder::new()
        .prefix(".cardstock-")
        .suffix(&suffix)
        .tempfile_in(dir)?;

    let icc_embedded = encode(canvas, temp.as_file_mut(), format, icc)?;
    temp.as_file_mut().flush()?;

    let dpi_tagged = tag_resolution(temp.path(), dpi);

    temp.persist(dest).map_err(|e| FinalizeError::Io(e.error))?;
    Ok(FinalizeReport { icc_embedded, dpi_tagged })
}

fn encode(
    canvas: &RgbImage,
    file: &mut std::fs::File,
    format: Format,
    icc: Option<&[u8]>,
) -> Result<bool, FinalizeError> {
    let (w, h) = canvas.dimensions();
    let mut writer = BufWriter::new(file);
    let mut icc_embedded = false;

    match format {
        Format::Png => {
            let mut encoder = PngEncoder::new(&mut writer);
            if let Some(profile) = icc {
                icc_embedded = encoder.set_icc_profile(profile.to_vec()).is_ok();
            }
            encoder.write_image(canvas.as_raw(), w, h, ExtendedColorType::Rgb8)?;
        }
        Format::Jpeg => {
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, 95);
            if let Some(profile) = icc {
                icc_embedded = encoder.set_icc_profile(profile.to_vec()).is_ok();
            }
            encoder.write_image(canvas.as_raw(), w, h, ExtendedColorType::Rgb8)?;
        }
        Format::Tiff => {
            // The TIFF encoder has no ICC support; the profile is dropped
            let encoder = TiffEncoder::new(&mut writer);
            encoder.write_image(canvas.as_raw(), w, h, ExtendedColorType::Rgb8)?;
        }
    }

    writer.flush()?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.rewind()?;
    Ok(icc_embedded)
}

/// Stamp X/Y resolution EXIF tags (unit: inches) onto the encoded file.
///
/// `little_exif` cannot tag every container it parses and is known to panic
/// on some of them, so failures (and panics) downgrade to `false` rather
/// than aborting a run whose pixels are already correct.
fn tag_resolution(path: &Path, dpi: u32) -> bool {
    let mut metadata = Metadata::new();
    let resolution = uR64 { nominator: dpi, denominator: 1 };
    metadata.set_tag(ExifTag::XResolution(vec![resolution.clone()]));
    metadata.set_tag(ExifTag::YResolution(vec![resolution]));
    // 2 = inches
    metadata.set_tag(ExifTag::ResolutionUnit(vec![2u16]));

    let target = path.to_path_buf();
    let written = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        metadata.write_to_file(&target)
    }));
    matches!(written, Ok(Ok(())))
}
