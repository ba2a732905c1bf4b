//! Parameter types for the compositing pipeline.
//!
//! These structs describe *what* to composite, not *how* to do it. They are
//! the interface between [`config`](crate::config) (which decides values) and
//! the [`canvas`](super::canvas) / [`caption`](crate::caption) modules (which
//! do the actual pixel work). Every knob the original postcard variants
//! hard-coded as a module constant lives here as an explicit field.
//!
//! ## Types
//!
//! - [`Color`] — opaque RGB color, parsed from `#rrggbb` strings.
//! - [`PlacementMode`] — whether the canvas grows around the photo or the
//!   photo is resized to an exact physical size.
//! - [`OutputTarget`] — physical postcard dimensions, resolution, placement mode.
//! - [`BorderSpec`] — border color + width in inches.
//! - [`ShadowSpec`] — gradient shadow over the lower inner photo area.
//! - [`CaptionSpec`] — caption lines plus all layout and styling parameters.
//! - [`TextShadow`] — offset translucent duplicate rendered under the caption.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Default output resolution when the config does not pin one.
pub const DEFAULT_DPI: u32 = 300;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid color `{0}`, expected `#rrggbb`")]
pub struct ColorParseError(String);

/// Opaque RGB color.
///
/// Serialized as a `#rrggbb` hex string in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').ok_or_else(|| ColorParseError(s.into()))?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorParseError(s.into()));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError(s.into()))
        };
        Ok(Self {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How the cropped photo and the output canvas relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Canvas grows to fit the cropped photo plus border; pixels are never
    /// resampled. Output DPI is derived from the physical target unless pinned.
    Grow,
    /// Canvas is exactly the physical target at the configured DPI; the photo
    /// is resampled to fill the area inside the border.
    Fit,
}

/// Physical output geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTarget {
    /// Postcard width in inches.
    pub width_in: f64,
    /// Postcard height in inches.
    pub height_in: f64,
    /// Output resolution. `None` means derive ([`PlacementMode::Grow`]) or
    /// fall back to [`DEFAULT_DPI`] ([`PlacementMode::Fit`]).
    pub dpi: Option<u32>,
    pub mode: PlacementMode,
}

impl OutputTarget {
    /// Target aspect ratio (width / height).
    pub fn ratio(&self) -> f64 {
        self.width_in / self.height_in
    }
}

/// Border fill around the photo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSpec {
    pub color: Color,
    /// Uniform border width in inches, resolved to pixels via the output DPI.
    pub width_in: f64,
}

/// Vertical gradient shadow composited over the bottom of the inner photo
/// area. Zero opacity or zero height fraction makes the compositor a no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSpec {
    pub color: Color,
    /// Opacity at the bottom edge, in `[0, 1]`.
    pub opacity: f64,
    /// Fraction of the inner photo height covered by the gradient, in `[0, 1]`.
    pub height_frac: f64,
}

impl ShadowSpec {
    /// True when compositing this shadow would not change a single pixel.
    pub fn is_noop(&self) -> bool {
        self.opacity <= 0.0 || self.height_frac <= 0.0
    }
}

/// Drop shadow rendered beneath the caption glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextShadow {
    pub color: Color,
    /// Shadow opacity in `[0, 1]`.
    pub opacity: f64,
    /// Offset `(dx, dy)` in pixels from the caption position.
    pub offset: (i32, i32),
}

/// Where the caption block is anchored vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Bottom,
}

/// Horizontal alignment of caption lines within the inner photo width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Full caption specification: text, placement, and styling.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionSpec {
    /// Caption lines, rendered top to bottom in order.
    pub lines: Vec<String>,
    pub anchor: Anchor,
    pub align: Align,
    /// Signed vertical offset in pixels added to the anchor-derived start y.
    pub offset_px: i32,
    /// Per-line horizontal pixel offsets. Lines without an entry default to 0.
    pub line_offsets: Vec<i32>,
    /// Fixed point size, or `None` for auto-fit.
    pub font_size: Option<u32>,
    /// Ordered font candidates, tried first to last.
    pub fonts: Vec<PathBuf>,
    pub fill: Color,
    pub shadow: Option<TextShadow>,
    /// Caption box height budget as a fraction of canvas height.
    pub height_frac: f64,
}

impl CaptionSpec {
    /// Horizontal offset for line `i` (0 when no entry was configured).
    pub fn line_offset(&self, i: usize) -> i32 {
        self.line_offsets.get(i).copied().unwrap_or(0)
    }
}
