//! Caption measurement and the auto-fit font size search.
//!
//! The fit algorithm is expressed against the [`TextMeasurer`] trait so it
//! can be exercised with synthetic metrics in tests; the production
//! implementation is [`GlyphMeasurer`], backed by `ab_glyph` outlines.
//!
//! ## Auto-fit
//!
//! [`fit_size`] binary-searches integer point sizes between
//! [`MIN_POINT_SIZE`] and [`MAX_POINT_SIZE`] for the largest size where
//! every line's tight width fits the box width and the stacked height
//! (including 15%-of-size inter-line gaps) fits the box height. The search
//! relies on acceptance being monotonic in size: a larger size never fits
//! when a smaller one did not. Font metrics satisfy this.

use super::font::ResolvedFont;
use crate::compose::calculations::total_text_height;
use ab_glyph::{Font, FontArc, Glyph, PxScale, ScaleFont};

/// Smallest candidate point size; the engine degrades to this rather than fail.
pub const MIN_POINT_SIZE: u32 = 6;
/// Largest candidate point size.
pub const MAX_POINT_SIZE: u32 = 600;

/// Measures the tight pixel bounding box of one text line at a point size.
pub trait TextMeasurer {
    /// Tight `(width, height)` of `text` rendered at `size`.
    fn measure(&self, size: u32, text: &str) -> (u32, u32);
}

/// Production measurer backed by glyph outlines.
pub struct GlyphMeasurer<'a> {
    font: &'a FontArc,
}

impl<'a> GlyphMeasurer<'a> {
    pub fn new(resolved: &'a ResolvedFont) -> Self {
        Self { font: &resolved.font }
    }
}

impl TextMeasurer for GlyphMeasurer<'_> {
    fn measure(&self, size: u32, text: &str) -> (u32, u32) {
        line_run(self.font, size, text).size()
    }
}

/// Glyphs of one line positioned on a baseline at the origin, plus their
/// tight outline bounds.
pub(crate) struct LineRun {
    pub glyphs: Vec<Glyph>,
    /// `(min_x, min_y, max_x, max_y)` of the union of outline bounds, or
    /// `None` when nothing is drawable (empty or whitespace-only line).
    pub bounds: Option<(f32, f32, f32, f32)>,
}

impl LineRun {
    /// Tight pixel size, `(0, 0)` when nothing is drawable.
    pub fn size(&self) -> (u32, u32) {
        match self.bounds {
            Some((min_x, min_y, max_x, max_y)) => {
                ((max_x - min_x).ceil() as u32, (max_y - min_y).ceil() as u32)
            }
            None => (0, 0),
        }
    }
}

/// Shape one line: position glyphs with kerning and collect tight bounds.
pub(crate) fn line_run(font: &FontArc, size: u32, text: &str) -> LineRun {
    let scale = PxScale::from(size as f32);
    let scaled = font.as_scaled(scale);

    let mut glyphs = Vec::with_capacity(text.chars().count());
    let mut bounds: Option<(f32, f32, f32, f32)> = None;
    let mut caret = 0.0f32;
    let mut prev = None;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, ab_glyph::point(caret, 0.0));
        caret += scaled.h_advance(id);
        prev = Some(id);

        if let Some(outlined) = font.outline_glyph(glyph.clone()) {
            let b = outlined.px_bounds();
            bounds = Some(match bounds {
                None => (b.min.x, b.min.y, b.max.x, b.max.y),
                Some((x0, y0, x1, y1)) => {
                    (x0.min(b.min.x), y0.min(b.min.y), x1.max(b.max.x), y1.max(b.max.y))
                }
            });
        }
        glyphs.push(glyph);
    }

    LineRun { glyphs, bounds }
}

/// Outcome of the auto-fit search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitResult {
    /// Resolved point size.
    pub size: u32,
    /// False when even [`MIN_POINT_SIZE`] overflows the box and the engine
    /// degraded to it instead of failing.
    pub fits: bool,
}

/// Find the largest point size whose lines fit `max_w` × `max_h`.
pub fn fit_size(
    measurer: &dyn TextMeasurer,
    lines: &[String],
    max_w: u32,
    max_h: u32,
) -> FitResult {
    let accepts = |size: u32| {
        let mut widest = 0u32;
        let mut heights = Vec::with_capacity(lines.len());
        for line in lines {
            let (w, h) = measurer.measure(size, line);
            widest = widest.max(w);
            heights.push(h);
        }
        widest <= max_w && total_text_height(&heights, size) <= max_h
    };

    let mut lo = MIN_POINT_SIZE;
    let mut hi = MAX_POINT_SIZE;
    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        if accepts(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    FitResult { size: lo, fits: accepts(lo) }
}
