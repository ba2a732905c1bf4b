//! Layout and compositing engine — crop, border canvas, gradient shadow.
//!
//! | Stage | Function |
//! |---|---|
//! | **Cropper** | [`crop_to_ratio`] — centered crop to the target aspect |
//! | **Canvas Assembler** | [`assemble`] — border fill + paste, grow or fit mode |
//! | **Shadow Compositor** | [`apply_shadow`] — bottom-edge alpha gradient |
//!
//! The module is split into:
//! - **Calculations**: pure functions for geometry math (unit testable)
//! - **Parameters**: data structures describing the composite
//! - **Canvas**: the pixel-touching stage implementations

pub mod calculations;
pub mod canvas;
pub mod params;

pub use calculations::{caption_start_y, caption_x, crop_region, line_gap, total_text_height, CropRegion};
pub use canvas::{apply_shadow, assemble, crop_to_ratio, Assembled, ComposeError};
pub use params::{
    Align, Anchor, BorderSpec, CaptionSpec, Color, OutputTarget, PlacementMode, ShadowSpec,
    TextShadow, DEFAULT_DPI,
};
