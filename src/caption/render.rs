//! Caption rendering: resolved-size layout, drop shadow pass, glyph blending.
//!
//! This is the engine's entry point. It resolves a font, fixes a point size
//! (configured or auto-fit), computes per-line positions from the alignment
//! and offset rules, and rasterizes each line — shadow copy first, fill glyphs
//! on top — directly into the canvas.

use super::font::{self, FontError, ResolvedFont};
use super::layout::{fit_size, line_run, GlyphMeasurer, LineRun};
use crate::compose::calculations::{caption_start_y, caption_x, line_gap, total_text_height};
use crate::compose::canvas::blend_over;
use crate::compose::params::CaptionSpec;
use ab_glyph::Font;
use image::RgbImage;

/// What the caption pass did, for the run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionReport {
    /// Point size the text was rendered at.
    pub size: u32,
    /// True when the size came from the auto-fit search.
    pub auto_fitted: bool,
    /// True when even the minimum size overflowed the caption box and the
    /// engine emitted at the floor anyway.
    pub degraded: bool,
    /// Font file that won the fallback chain.
    pub font_path: std::path::PathBuf,
    pub lines: usize,
}

/// Lay out and render the caption onto `canvas`.
///
/// Returns `Ok(None)` when the spec has no lines. The canvas is mutated in
/// place; the caption box is the inner photo width by `height_frac` of the
/// canvas height.
pub fn render_caption(
    canvas: &mut RgbImage,
    spec: &CaptionSpec,
    margin: u32,
) -> Result<Option<CaptionReport>, FontError> {
    if spec.lines.is_empty() {
        return Ok(None);
    }

    let resolved = font::resolve(&spec.fonts)?;
    let (canvas_w, canvas_h) = canvas.dimensions();
    let inner_w = canvas_w.saturating_sub(2 * margin);
    let box_h = (spec.height_frac * canvas_h as f64).round() as u32;

    let (size, auto_fitted, degraded) = match spec.font_size {
        Some(fixed) => (fixed, false, false),
        None => {
            let measurer = GlyphMeasurer::new(&resolved);
            let fit = fit_size(&measurer, &spec.lines, inner_w, box_h);
            (fit.size, true, !fit.fits)
        }
    };

    let runs: Vec<LineRun> = spec
        .lines
        .iter()
        .map(|line| line_run(&resolved.font, size, line))
        .collect();
    let heights: Vec<u32> = runs.iter().map(|r| r.size().1).collect();
    let total_h = total_text_height(&heights, size);

    let mut y = caption_start_y(spec.anchor, canvas_h, margin, total_h, spec.offset_px);
    for (i, run) in runs.iter().enumerate() {
        let (line_w, line_h) = run.size();
        let x = caption_x(spec.align, canvas_w, margin, line_w, spec.line_offset(i));

        if let Some(shadow) = &spec.shadow {
            draw_run(
                canvas,
                &resolved,
                run,
                x + shadow.offset.0,
                y + shadow.offset.1,
                shadow.color.channels(),
                shadow.opacity as f32,
            );
        }
        draw_run(canvas, &resolved, run, x, y, spec.fill.channels(), 1.0);

        y += line_h as i32 + line_gap(size) as i32;
    }

    Ok(Some(CaptionReport {
        size,
        auto_fitted,
        degraded,
        font_path: resolved.path,
        lines: spec.lines.len(),
    }))
}

/// Rasterize one shaped line with its tight top-left corner at `(x, y)`.
///
/// Glyph coverage is multiplied by `opacity` and alpha-blended over the
/// canvas, which yields the font's native anti-aliasing; out-of-canvas
/// pixels are clipped.
fn draw_run(
    canvas: &mut RgbImage,
    resolved: &ResolvedFont,
    run: &LineRun,
    x: i32,
    y: i32,
    color: [u8; 3],
    opacity: f32,
) {
    let Some((min_x, min_y, _, _)) = run.bounds else {
        return;
    };
    let (dx, dy) = (x as f32 - min_x, y as f32 - min_y);

    for glyph in &run.glyphs {
        let Some(outlined) = resolved.font.outline_glyph(glyph.clone()) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|px, py, coverage| {
            let alpha = coverage * opacity;
            if alpha <= 0.0 {
                return;
            }
            let cx = (bounds.min.x + dx) as i64 + px as i64;
            let cy = (bounds.min.y + dy) as i64 + py as i64;
            if cx < 0 || cy < 0 || cx >= canvas.width() as i64 || cy >= canvas.height() as i64 {
                return;
            }
            let pixel = canvas.get_pixel_mut(cx as u32, cy as u32);
            *pixel = blend_over(*pixel, color, alpha.min(1.0));
        });
    }
}
