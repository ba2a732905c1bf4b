//! Pixel operations: crop, border-canvas assembly, gradient shadow.
//!
//! All three stages operate on one in-memory raster and complete before the
//! next begins. Coordinate math is delegated to
//! [`calculations`](super::calculations); this module only moves pixels.

use super::calculations::{crop_region, derive_dpi, gradient_alpha, margin_px};
use super::params::{BorderSpec, OutputTarget, PlacementMode, ShadowSpec, DEFAULT_DPI};
use crate::compose::CropRegion;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result of [`assemble`]: the bordered canvas plus the resolved geometry the
/// later stages need.
#[derive(Debug)]
pub struct Assembled {
    pub canvas: RgbImage,
    /// Border width in pixels on every edge.
    pub margin_px: u32,
    /// Effective output resolution (configured or derived).
    pub dpi: u32,
}

/// Crop `image` to the largest centered region matching `ratio` (w/h).
///
/// The source is never mutated; pixels outside the kept region are discarded.
pub fn crop_to_ratio(
    image: &DynamicImage,
    ratio: f64,
) -> Result<(RgbImage, CropRegion), ComposeError> {
    let (w, h) = (image.width(), image.height());
    if w == 0 || h == 0 {
        return Err(ComposeError::InvalidInput(format!(
            "source image has a zero dimension ({w}x{h})"
        )));
    }
    let region = crop_region(w, h, ratio);
    let cropped = image
        .crop_imm(region.x0, region.y0, region.width(), region.height())
        .to_rgb8();
    Ok((cropped, region))
}

/// Build the bordered output canvas around (or from) the cropped photo.
///
/// - [`PlacementMode::Grow`]: canvas = photo + 2×margin per axis, photo pasted
///   as-is at `(margin, margin)`. DPI is derived from the physical target when
///   not pinned in config.
/// - [`PlacementMode::Fit`]: canvas = physical target × DPI, photo resampled
///   (Lanczos3) to the area inside the border.
pub fn assemble(
    cropped: &RgbImage,
    border: &BorderSpec,
    target: &OutputTarget,
) -> Result<Assembled, ComposeError> {
    match target.mode {
        PlacementMode::Grow => {
            let dpi = target.dpi.unwrap_or_else(|| {
                derive_dpi(
                    (cropped.width(), cropped.height()),
                    (target.width_in, target.height_in),
                    border.width_in,
                )
            });
            let margin = margin_px(border.width_in, dpi);
            let canvas_w = cropped.width() + 2 * margin;
            let canvas_h = cropped.height() + 2 * margin;
            let mut canvas = filled_canvas(canvas_w, canvas_h, border.color.channels());
            imageops::replace(&mut canvas, cropped, margin as i64, margin as i64);
            Ok(Assembled { canvas, margin_px: margin, dpi })
        }
        PlacementMode::Fit => {
            let dpi = target.dpi.unwrap_or(DEFAULT_DPI);
            let canvas_w = (target.width_in * dpi as f64).round() as u32;
            let canvas_h = (target.height_in * dpi as f64).round() as u32;
            let margin = margin_px(border.width_in, dpi);
            if 2 * margin >= canvas_w || 2 * margin >= canvas_h {
                return Err(ComposeError::InvalidInput(format!(
                    "border of {margin}px leaves no room on a {canvas_w}x{canvas_h}px canvas"
                )));
            }
            let inner_w = canvas_w - 2 * margin;
            let inner_h = canvas_h - 2 * margin;
            let resized = imageops::resize(cropped, inner_w, inner_h, FilterType::Lanczos3);
            let mut canvas = filled_canvas(canvas_w, canvas_h, border.color.channels());
            imageops::replace(&mut canvas, &resized, margin as i64, margin as i64);
            Ok(Assembled { canvas, margin_px: margin, dpi })
        }
    }
}

/// Composite the gradient shadow over the bottom of the inner photo area.
///
/// Zero opacity or zero height fraction leaves the canvas byte-identical.
/// Pixels within the border margin are never written: the band spans exactly
/// the inner width and its bottom edge sits on the inner photo's bottom edge.
pub fn apply_shadow(canvas: &mut RgbImage, margin: u32, spec: &ShadowSpec) {
    if spec.is_noop() {
        return;
    }
    let (w, h) = canvas.dimensions();
    if 2 * margin >= w || 2 * margin >= h {
        return;
    }
    let inner_w = w - 2 * margin;
    let inner_h = h - 2 * margin;
    let grad_h = ((inner_h as f64 * spec.height_frac).floor() as u32).min(inner_h);
    if grad_h == 0 {
        return;
    }

    let band_top = margin + inner_h - grad_h;
    let color = spec.color.channels();
    for y in 0..grad_h {
        // One alpha per row, uniform across the band width
        let alpha = gradient_alpha(spec.opacity, grad_h, y) as f32 / 255.0;
        if alpha == 0.0 {
            continue;
        }
        for x in margin..margin + inner_w {
            let px = canvas.get_pixel_mut(x, band_top + y);
            *px = blend_over(*px, color, alpha);
        }
    }
}

/// Standard alpha-over blend of a solid color onto an opaque pixel.
pub(crate) fn blend_over(base: Rgb<u8>, color: [u8; 3], alpha: f32) -> Rgb<u8> {
    let mix = |b: u8, c: u8| (b as f32 * (1.0 - alpha) + c as f32 * alpha).round() as u8;
    Rgb([
        mix(base.0[0], color[0]),
        mix(base.0[1], color[1]),
        mix(base.0[2], color[2]),
    ])
}

fn filled_canvas(w: u32, h: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb(color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::params::Color;
    use crate::test_helpers::{photo, solid};

    fn grow_target() -> OutputTarget {
        OutputTarget {
            width_in: 4.0,
            height_in: 6.0,
            dpi: Some(300),
            mode: PlacementMode::Grow,
        }
    }

    fn border() -> BorderSpec {
        BorderSpec {
            color: Color::new(245, 245, 220),
            width_in: 0.1,
        }
    }

    // =========================================================================
    // crop_to_ratio tests
    // =========================================================================

    #[test]
    fn crop_rejects_zero_dimension() {
        let img = DynamicImage::new_rgb8(0, 100);
        assert!(matches!(
            crop_to_ratio(&img, 1.0),
            Err(ComposeError::InvalidInput(_))
        ));
    }

    #[test]
    fn crop_keeps_center_slice() {
        // Source: left third red, middle third green, right third blue
        let mut img = RgbImage::new(300, 100);
        for (x, _, px) in img.enumerate_pixels_mut() {
            *px = match x {
                0..=99 => Rgb([255, 0, 0]),
                100..=199 => Rgb([0, 255, 0]),
                _ => Rgb([0, 0, 255]),
            };
        }
        let (cropped, region) = crop_to_ratio(&DynamicImage::ImageRgb8(img), 1.0).unwrap();
        assert_eq!(region, CropRegion { x0: 100, y0: 0, x1: 200, y1: 100 });
        assert_eq!(cropped.dimensions(), (100, 100));
        assert_eq!(*cropped.get_pixel(0, 0), Rgb([0, 255, 0]));
        assert_eq!(*cropped.get_pixel(99, 99), Rgb([0, 255, 0]));
    }

    // =========================================================================
    // assemble tests
    // =========================================================================

    #[test]
    fn grow_mode_wraps_photo_in_margin() {
        let cropped = photo(400, 600);
        let out = assemble(&cropped, &border(), &grow_target()).unwrap();
        // 0.1in at 300dpi = 30px margin on each edge
        assert_eq!(out.margin_px, 30);
        assert_eq!(out.dpi, 300);
        assert_eq!(out.canvas.dimensions(), (460, 660));
        // Border corners filled, photo pasted at (margin, margin) untouched
        assert_eq!(*out.canvas.get_pixel(0, 0), Rgb([245, 245, 220]));
        assert_eq!(*out.canvas.get_pixel(459, 659), Rgb([245, 245, 220]));
        assert_eq!(*out.canvas.get_pixel(30, 30), *cropped.get_pixel(0, 0));
        assert_eq!(*out.canvas.get_pixel(429, 629), *cropped.get_pixel(399, 599));
    }

    #[test]
    fn grow_mode_derives_dpi_when_unpinned() {
        let mut target = grow_target();
        target.dpi = None;
        // 1140x1740 photo in a 4x6 card with 0.1in border → 300 dpi, 30px margin
        let out = assemble(&photo(1140, 1740), &border(), &target).unwrap();
        assert_eq!(out.dpi, 300);
        assert_eq!(out.margin_px, 30);
        assert_eq!(out.canvas.dimensions(), (1200, 1800));
    }

    #[test]
    fn fit_mode_hits_exact_physical_size() {
        let target = OutputTarget {
            width_in: 4.0,
            height_in: 6.0,
            dpi: Some(50),
            mode: PlacementMode::Fit,
        };
        let out = assemble(&photo(400, 600), &border(), &target).unwrap();
        assert_eq!(out.canvas.dimensions(), (200, 300));
        assert_eq!(out.margin_px, 5);
        assert_eq!(*out.canvas.get_pixel(0, 0), Rgb([245, 245, 220]));
        // Photo area starts right after the margin
        assert_ne!(*out.canvas.get_pixel(5, 150), Rgb([245, 245, 220]));
    }

    #[test]
    fn fit_mode_rejects_border_wider_than_canvas() {
        let target = OutputTarget {
            width_in: 0.5,
            height_in: 0.5,
            dpi: Some(100),
            mode: PlacementMode::Fit,
        };
        let wide_border = BorderSpec {
            color: Color::new(0, 0, 0),
            width_in: 0.25,
        };
        assert!(assemble(&photo(100, 100), &wide_border, &target).is_err());
    }

    #[test]
    fn assemble_does_not_mutate_cropped_input() {
        let cropped = photo(50, 80);
        let before = cropped.clone();
        assemble(&cropped, &border(), &grow_target()).unwrap();
        assert_eq!(cropped, before);
    }

    // =========================================================================
    // apply_shadow tests
    // =========================================================================

    fn shadow(opacity: f64, height_frac: f64) -> ShadowSpec {
        ShadowSpec {
            color: Color::new(24, 18, 12),
            opacity,
            height_frac,
        }
    }

    #[test]
    fn zero_opacity_shadow_is_byte_identical() {
        let mut canvas = solid(100, 150, [200, 200, 200]);
        let before = canvas.clone();
        apply_shadow(&mut canvas, 10, &shadow(0.0, 0.5));
        assert_eq!(canvas, before);
    }

    #[test]
    fn zero_height_shadow_is_byte_identical() {
        let mut canvas = solid(100, 150, [200, 200, 200]);
        let before = canvas.clone();
        apply_shadow(&mut canvas, 10, &shadow(1.0, 0.0));
        assert_eq!(canvas, before);
    }

    #[test]
    fn shadow_never_touches_border_even_at_full_height() {
        let mut canvas = solid(120, 180, [200, 200, 200]);
        apply_shadow(&mut canvas, 15, &shadow(1.0, 1.0));
        let (w, h) = canvas.dimensions();
        for x in 0..w {
            for y in 0..h {
                let in_border = x < 15 || x >= w - 15 || y < 15 || y >= h - 15;
                if in_border {
                    assert_eq!(
                        *canvas.get_pixel(x, y),
                        Rgb([200, 200, 200]),
                        "border pixel ({x},{y}) was written"
                    );
                }
            }
        }
    }

    #[test]
    fn shadow_darkens_toward_bottom_edge() {
        let mut canvas = solid(100, 200, [200, 200, 200]);
        apply_shadow(&mut canvas, 10, &shadow(1.0, 0.5));
        let x = 50;
        // inner height 180, band = 90 rows ending at y=189
        let top_band = canvas.get_pixel(x, 100).0[0];
        let mid_band = canvas.get_pixel(x, 150).0[0];
        let bottom_band = canvas.get_pixel(x, 189).0[0];
        assert!(top_band > mid_band && mid_band > bottom_band);
        // Bottom row carries the full shadow color
        assert_eq!(*canvas.get_pixel(x, 189), Rgb([24, 18, 12]));
        // Row above the band start is untouched
        assert_eq!(*canvas.get_pixel(x, 99), Rgb([200, 200, 200]));
    }

    #[test]
    fn shadow_band_is_horizontally_uniform() {
        let mut canvas = solid(100, 200, [200, 200, 200]);
        apply_shadow(&mut canvas, 10, &shadow(0.8, 0.4));
        for y in 120..190 {
            let reference = *canvas.get_pixel(10, y);
            for x in 10..90 {
                assert_eq!(*canvas.get_pixel(x, y), reference, "row {y} not uniform");
            }
        }
    }
}
