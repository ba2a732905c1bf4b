//! Font resolution with an ordered fallback chain.
//!
//! Candidates are tried first to last; the first file that loads wins. After
//! the user-configured candidates, a built-in list of fonts that ship with
//! every mainstream OS is tried, so a missing custom font degrades to a
//! system font instead of aborting the run.

use ab_glyph::FontArc;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("no usable font among {tried} candidate(s), including system fallbacks")]
    Unavailable { tried: usize },
}

/// Well-known system font locations, tried after the configured candidates.
const SYSTEM_FALLBACKS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/Supplemental/Helvetica Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A loaded font plus the path it came from.
///
/// The font is size-independent; point sizes are applied per render pass via
/// `ab_glyph::PxScale`, so one `ResolvedFont` serves the whole fit search.
#[derive(Debug, Clone)]
pub struct ResolvedFont {
    pub font: FontArc,
    pub path: PathBuf,
}

/// Resolve a font through `candidates`, then [`SYSTEM_FALLBACKS`].
///
/// Load failures (missing file, unparsable data) are swallowed as long as a
/// later candidate succeeds; [`FontError::Unavailable`] surfaces only when
/// every candidate fails.
pub fn resolve(candidates: &[PathBuf]) -> Result<ResolvedFont, FontError> {
    let mut tried = 0;
    for path in candidates
        .iter()
        .map(PathBuf::as_path)
        .chain(SYSTEM_FALLBACKS.iter().map(Path::new))
    {
        tried += 1;
        if let Some(font) = load(path) {
            return Ok(ResolvedFont { font, path: path.to_path_buf() });
        }
    }
    Err(FontError::Unavailable { tried })
}

fn load(path: &Path) -> Option<FontArc> {
    let data = std::fs::read(path).ok()?;
    FontArc::try_from_vec(data).ok()
}
