//! Caption layout engine — font fallback, auto-fit sizing, glyph rendering.
//!
//! | Concern | Module |
//! |---|---|
//! | Font fallback chain | [`font`] |
//! | Measurement + binary-search fitting | [`layout`] |
//! | Placement + rasterization | [`render`] |

pub mod font;
pub mod layout;
pub mod render;

pub use font::{resolve, FontError, ResolvedFont};
pub use layout::{fit_size, FitResult, GlyphMeasurer, TextMeasurer, MAX_POINT_SIZE, MIN_POINT_SIZE};
pub use render::{render_caption, CaptionReport};
