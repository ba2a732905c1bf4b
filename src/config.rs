//! Postcard configuration module.
//!
//! Handles loading and validating `postcard.toml`. Every knob the original
//! one-off scripts hard-coded as a module constant is an explicit config
//! value here, so one parameterized pipeline covers all the script variants:
//! shadow on/off, custom vs. system font, single- vs. multi-line caption,
//! grown vs. exact-size canvas.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! input = "photo.png"          # Source photo (CLI positional overrides)
//!
//! [output]
//! width_in = 4.0               # Physical postcard width (inches)
//! height_in = 6.0              # Physical postcard height (inches)
//! # dpi = 300                  # Omit to derive from the photo in grow mode
//! mode = "grow"                # "grow" (canvas wraps photo) | "fit" (exact size)
//! path = "postcard.tif"        # Destination (.tif, .png, or .jpg)
//!
//! [border]
//! width_in = 0.1               # Border width (inches)
//! color = "#c3c5b0"            # Border fill
//!
//! [shadow]
//! enabled = true
//! color = "#18120c"
//! opacity = 1.0                # Darkest opacity at the bottom edge (0-1)
//! height_frac = 0.55           # Fraction of inner photo height covered
//!
//! [caption]
//! lines = []                   # e.g. ["Wind Cave", "National Park"]
//! position = "bottom"          # "bottom" | "top"
//! align = "left"               # "left" | "center" | "right"
//! offset_px = 0                # Signed; added to the anchor-derived start y
//! line_offsets = []            # Per-line horizontal offsets (px)
//! # font_size = 300            # Omit for auto-fit
//! fonts = []                   # Ordered candidates; system fonts tried after
//! fill = "#c3c5b0"
//! height_frac = 0.12           # Caption box height budget (fraction of canvas)
//!
//! [caption.shadow]             # Omit the whole table to disable
//! color = "#000000"
//! opacity = 0.5
//! offset = [3, 3]
//!
//! [tonemap]
//! enabled = true               # Tone-map wide-gamut sources to sRGB first
//! tool = "sips"
//! profile = "/System/Library/ColorSync/Profiles/sRGB Profile.icc"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::compose::params::{Align, Anchor, CaptionSpec, Color, PlacementMode, TextShadow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Postcard configuration loaded from `postcard.toml`.
///
/// All fields have defaults mirroring the original postcard scripts. User
/// config files need only specify the values they want to override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostcardConfig {
    /// Source photo path. A CLI positional argument takes precedence.
    pub input: Option<PathBuf>,
    pub output: OutputConfig,
    pub border: BorderConfig,
    pub shadow: ShadowConfig,
    pub caption: CaptionConfig,
    pub tonemap: ToneMapConfig,
}

impl PostcardConfig {
    /// Load a config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let raw = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.width_in <= 0.0 || self.output.height_in <= 0.0 {
            return Err(ConfigError::Validation(
                "output.width_in and output.height_in must be positive".into(),
            ));
        }
        if self.output.dpi == Some(0) {
            return Err(ConfigError::Validation("output.dpi must be non-zero".into()));
        }
        if self.border.width_in < 0.0 {
            return Err(ConfigError::Validation(
                "border.width_in must not be negative".into(),
            ));
        }
        // Margin must stay strictly inside both halves of the output
        if 2.0 * self.border.width_in >= self.output.width_in
            || 2.0 * self.border.width_in >= self.output.height_in
        {
            return Err(ConfigError::Validation(
                "border.width_in must be less than half of either output dimension".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.shadow.opacity) {
            return Err(ConfigError::Validation("shadow.opacity must be 0-1".into()));
        }
        if !(0.0..=1.0).contains(&self.shadow.height_frac) {
            return Err(ConfigError::Validation(
                "shadow.height_frac must be 0-1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.caption.height_frac) {
            return Err(ConfigError::Validation(
                "caption.height_frac must be 0-1".into(),
            ));
        }
        if self.caption.font_size == Some(0) {
            return Err(ConfigError::Validation(
                "caption.font_size must be non-zero (omit it for auto-fit)".into(),
            ));
        }
        if !self.caption.line_offsets.is_empty()
            && self.caption.line_offsets.len() != self.caption.lines.len()
        {
            return Err(ConfigError::Validation(format!(
                "caption.line_offsets has {} entries for {} lines",
                self.caption.line_offsets.len(),
                self.caption.lines.len()
            )));
        }
        if let Some(shadow) = &self.caption.shadow {
            if !(0.0..=1.0).contains(&shadow.opacity) {
                return Err(ConfigError::Validation(
                    "caption.shadow.opacity must be 0-1".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Physical output geometry and destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Postcard width in inches.
    pub width_in: f64,
    /// Postcard height in inches.
    pub height_in: f64,
    /// Output resolution. Omit to derive it in grow mode (300 in fit mode).
    pub dpi: Option<u32>,
    /// Whether the canvas grows around the photo or the photo is resized.
    pub mode: PlacementMode,
    /// Destination file; the extension selects the encoder.
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width_in: 4.0,
            height_in: 6.0,
            dpi: None,
            mode: PlacementMode::Grow,
            path: PathBuf::from("postcard.tif"),
        }
    }
}

/// Border fill settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BorderConfig {
    pub width_in: f64,
    pub color: Color,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            width_in: 0.1,
            color: Color::new(195, 197, 176),
        }
    }
}

/// Gradient shadow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadowConfig {
    pub enabled: bool,
    pub color: Color,
    pub opacity: f64,
    pub height_frac: f64,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Color::new(24, 18, 12),
            opacity: 1.0,
            height_frac: 0.55,
        }
    }
}

/// Caption text and styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionConfig {
    pub lines: Vec<String>,
    pub position: Anchor,
    pub align: Align,
    pub offset_px: i32,
    pub line_offsets: Vec<i32>,
    /// Fixed point size; omit for auto-fit.
    pub font_size: Option<u32>,
    pub fonts: Vec<PathBuf>,
    pub fill: Color,
    pub height_frac: f64,
    pub shadow: Option<TextShadowConfig>,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            position: Anchor::Bottom,
            align: Align::Left,
            offset_px: 0,
            line_offsets: Vec::new(),
            font_size: None,
            fonts: Vec::new(),
            fill: Color::new(195, 197, 176),
            height_frac: 0.12,
            shadow: None,
        }
    }
}

impl CaptionConfig {
    /// Build the engine-facing caption spec.
    pub fn to_spec(&self) -> CaptionSpec {
        CaptionSpec {
            lines: self.lines.clone(),
            anchor: self.position,
            align: self.align,
            offset_px: self.offset_px,
            line_offsets: self.line_offsets.clone(),
            font_size: self.font_size,
            fonts: self.fonts.clone(),
            fill: self.fill,
            shadow: self.shadow.as_ref().map(TextShadowConfig::to_spec),
            height_frac: self.height_frac,
        }
    }
}

/// Caption drop shadow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextShadowConfig {
    pub color: Color,
    pub opacity: f64,
    /// `[dx, dy]` pixel offset of the shadow copy.
    pub offset: [i32; 2],
}

impl Default for TextShadowConfig {
    fn default() -> Self {
        Self {
            color: Color::new(0, 0, 0),
            opacity: 0.5,
            offset: [3, 3],
        }
    }
}

impl TextShadowConfig {
    fn to_spec(&self) -> TextShadow {
        TextShadow {
            color: self.color,
            opacity: self.opacity,
            offset: (self.offset[0], self.offset[1]),
        }
    }
}

/// External tone-mapping collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToneMapConfig {
    pub enabled: bool,
    /// Color-management tool invoked as `tool --matchTo <profile> <src> --out <dst>`.
    pub tool: String,
    pub profile: PathBuf,
}

impl Default for ToneMapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tool: "sips".into(),
            profile: PathBuf::from("/System/Library/ColorSync/Profiles/sRGB Profile.icc"),
        }
    }
}

/// Stock `postcard.toml` with every option documented, for `gen-config`.
pub fn stock_config_toml() -> &'static str {
    include_str!("../stock-config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        PostcardConfig::default().validate().unwrap();
    }

    #[test]
    fn sparse_config_overrides_only_named_values() {
        let config: PostcardConfig = toml::from_str(
            r#"
            [caption]
            lines = ["Wind Cave", "National Park"]
            offset_px = -75
            line_offsets = [100, 100]
            "#,
        )
        .unwrap();
        assert_eq!(config.caption.lines.len(), 2);
        assert_eq!(config.caption.offset_px, -75);
        // Untouched sections keep their defaults
        assert_eq!(config.output.width_in, 4.0);
        assert!(config.shadow.enabled);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<PostcardConfig, _> = toml::from_str("border_width = 0.1");
        assert!(result.is_err());
    }

    #[test]
    fn full_config_round_trips() {
        let config: PostcardConfig = toml::from_str(
            r##"
            input = "boxwork.png"

            [output]
            width_in = 4.0
            height_in = 6.0
            dpi = 300
            mode = "fit"
            path = "boxwork_postcard.tif"

            [border]
            width_in = 0.05
            color = "#f5f5dc"

            [shadow]
            enabled = true
            color = "#18120c"
            opacity = 1.0
            height_frac = 0.55

            [caption]
            lines = ["Wind Cave", "National Park"]
            position = "bottom"
            align = "left"
            offset_px = -75
            line_offsets = [100, 100]
            font_size = 300
            fonts = ["/Library/Fonts/IronickNF.otf"]
            fill = "#c3c5b0"
            height_frac = 0.12

            [caption.shadow]
            color = "#000000"
            opacity = 0.5
            offset = [3, 3]

            [tonemap]
            enabled = false
            "##,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.output.mode, PlacementMode::Fit);
        assert_eq!(config.caption.font_size, Some(300));
        let spec = config.caption.to_spec();
        assert_eq!(spec.shadow.unwrap().offset, (3, 3));
        assert_eq!(spec.line_offsets, vec![100, 100]);
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let mut config = PostcardConfig::default();
        config.shadow.opacity = 1.5;
        assert!(config.validate().is_err());

        let mut config = PostcardConfig::default();
        config.border.width_in = 2.5; // more than half of a 4in-wide card
        assert!(config.validate().is_err());

        let mut config = PostcardConfig::default();
        config.caption.lines = vec!["one".into()];
        config.caption.line_offsets = vec![1, 2];
        assert!(config.validate().is_err());

        let mut config = PostcardConfig::default();
        config.output.width_in = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = PostcardConfig::load(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.output.height_in, 6.0);
    }

    #[test]
    fn stock_config_parses_and_validates() {
        let config: PostcardConfig = toml::from_str(stock_config_toml()).unwrap();
        config.validate().unwrap();
    }
}
