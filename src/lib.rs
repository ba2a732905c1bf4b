//! # Cardstock
//!
//! Composite a single photograph into a fixed-size bordered postcard with an
//! optional bottom-edge gradient shadow and a stylized multi-line caption.
//! One parameterized pipeline replaces the pile of near-duplicate scripts
//! this tool grew from: every variation — shadow on/off, custom vs. system
//! font, single- vs. multi-line caption, grown vs. exact-size canvas — is a
//! configuration value, not a code path.
//!
//! # Architecture: One Synchronous Pipeline
//!
//! ```text
//! tonemap → load → crop → assemble → shadow → caption → finalize
//! ```
//!
//! Each stage fully completes on one in-memory raster before the next
//! begins. There is no cross-run state and no partial output: the
//! destination file appears only after the whole canvas is finalized.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `postcard.toml` loading, validation, stock config generation |
//! | [`pipeline`] | Stage orchestration and the unified error type |
//! | [`tonemap`] | External color-management collaborator (`sips`-style) |
//! | [`compose`] | Crop, border-canvas assembly, gradient shadow |
//! | [`caption`] | Font fallback, auto-fit sizing, glyph rendering |
//! | [`finalize`] | Atomic persistence with DPI tags and ICC carry-over |
//! | [`output`] | CLI run-summary formatting |
//!
//! # Design Decisions
//!
//! ## Calculations Before Pixels
//!
//! All geometry — crop rectangles, margins, gradient alphas, caption
//! placement — lives in pure functions
//! ([`compose::calculations`]), unit-tested without touching an image. The
//! pixel-moving code only executes decisions made there.
//!
//! ## Auto-Fit as a Search Over a Measurement Trait
//!
//! The caption's binary-search font sizing is written against a
//! [`caption::TextMeasurer`] trait. Production measures `ab_glyph` outline
//! bounds; tests substitute synthetic linear metrics, so the search's
//! monotonicity and idempotence are verifiable without font files on the
//! test host.
//!
//! ## Degrade, Don't Fail
//!
//! Two policies are deliberate: a caption that cannot fit even at the
//! minimum point size is emitted at the minimum and flagged in the run
//! summary, and resolution/ICC metadata that cannot be written downgrades
//! to a warning. Pixels are never held hostage by metadata.
//!
//! ## Tone-Mapping as an External Collaborator
//!
//! Gamut mapping is not reimplemented. The pipeline shells out to the OS
//! color-management tool, treats a non-zero exit as fatal, and carries the
//! resulting ICC profile through to the output file.

pub mod caption;
pub mod compose;
pub mod config;
pub mod finalize;
pub mod output;
pub mod pipeline;
pub mod tonemap;

#[cfg(test)]
pub(crate) mod test_helpers;
