//! Pure calculation functions for postcard geometry.
//!
//! All functions here are pure and testable without any I/O or images. The
//! pixel-touching code in [`canvas`](super::canvas) and
//! [`caption`](crate::caption) delegates every coordinate decision to this
//! module.

use super::params::{Align, Anchor};

/// Centered crop rectangle computed by [`crop_region`].
///
/// Half-open on no axis: `x1`/`y1` are exclusive, so the kept size is
/// `(x1 - x0, y1 - y0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl CropRegion {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

/// Largest centered region of `(width, height)` matching `ratio` (w/h).
///
/// The longer axis is trimmed symmetrically; the other axis is kept in full.
/// An exact ratio match degenerates to the identity region.
///
/// # Examples
/// ```
/// # use cardstock::compose::crop_region;
/// // 3:2 source cropped to 2:3 → full height, centered 2666px-wide slice
/// let r = crop_region(3000, 4000, 2.0 / 3.0);
/// assert_eq!((r.y0, r.y1), (0, 4000));
/// assert_eq!(r.width(), 2666);
/// ```
pub fn crop_region(width: u32, height: u32, ratio: f64) -> CropRegion {
    debug_assert!(width > 0 && height > 0);

    if width as f64 / height as f64 > ratio {
        // Source is relatively wider: trim width, keep full height
        let new_w = (height as f64 * ratio).floor() as u32;
        let left = (width - new_w) / 2;
        CropRegion {
            x0: left,
            y0: 0,
            x1: left + new_w,
            y1: height,
        }
    } else {
        // Source is relatively taller (or exact): trim height, keep full width
        let new_h = (width as f64 / ratio).floor() as u32;
        let top = (height - new_h) / 2;
        CropRegion {
            x0: 0,
            y0: top,
            x1: width,
            y1: top + new_h,
        }
    }
}

/// Resolve a physical border width to pixels at a given resolution.
pub fn margin_px(border_in: f64, dpi: u32) -> u32 {
    (border_in * dpi as f64).round() as u32
}

/// Derive the effective DPI when the canvas grows around the photo.
///
/// The cropped photo occupies the physical target minus the border on each
/// side; its pixel dimensions therefore imply a resolution per axis. The two
/// axes agree up to crop rounding, so their average is used.
pub fn derive_dpi(inner: (u32, u32), physical_in: (f64, f64), border_in: f64) -> u32 {
    let (inner_w, inner_h) = inner;
    let inner_w_in = physical_in.0 - 2.0 * border_in;
    let inner_h_in = physical_in.1 - 2.0 * border_in;
    let dpi_x = inner_w as f64 / inner_w_in;
    let dpi_y = inner_h as f64 / inner_h_in;
    ((dpi_x + dpi_y) / 2.0).round() as u32
}

/// Alpha value for row `y` of a vertical gradient ramp.
///
/// Linear from 0 at the top of the band to `opacity * 255` at the bottom
/// edge. A degenerate one-row band gets the full band opacity rather than
/// dividing by zero.
pub fn gradient_alpha(opacity: f64, grad_h: u32, y: u32) -> u8 {
    debug_assert!(y < grad_h);
    if grad_h <= 1 {
        return (opacity * 255.0).round() as u8;
    }
    (opacity * 255.0 * y as f64 / (grad_h - 1) as f64).round() as u8
}

/// Inter-line gap in pixels at a given point size (15% of the size).
pub fn line_gap(size: u32) -> u32 {
    (0.15 * size as f64).round() as u32
}

/// Total stacked height of caption lines including inter-line gaps.
pub fn total_text_height(line_heights: &[u32], size: u32) -> u32 {
    let gaps = line_heights.len().saturating_sub(1) as u32;
    line_heights.iter().sum::<u32>() + gaps * line_gap(size)
}

/// Starting y of the caption block (top edge of the first line's tight box).
///
/// The offset is added as-is: for a `bottom` anchor a positive offset moves
/// the block down toward the border, for `top` it also moves down.
pub fn caption_start_y(anchor: Anchor, canvas_h: u32, margin: u32, total_h: u32, offset: i32) -> i32 {
    match anchor {
        Anchor::Bottom => canvas_h as i32 - margin as i32 - total_h as i32 + offset,
        Anchor::Top => margin as i32 + offset,
    }
}

/// X of a caption line's tight left edge for the given alignment.
pub fn caption_x(align: Align, canvas_w: u32, margin: u32, line_w: u32, offset: i32) -> i32 {
    match align {
        Align::Left => margin as i32 + offset,
        Align::Right => canvas_w as i32 - margin as i32 - line_w as i32 + offset,
        Align::Center => (canvas_w as i32 - line_w as i32) / 2 + offset,
    }
}
