//! Shared test utilities for the cardstock test suite.

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Solid-colored raster.
pub fn solid(w: u32, h: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb(color))
}

/// Deterministic non-uniform "photo": a two-axis gradient, so paste offsets
/// and crops are detectable per-pixel.
pub fn photo(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// Write a solid PNG into `dir` and return its path.
pub fn write_png(dir: &Path, name: &str, w: u32, h: u32, color: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    solid(w, h, color).save(&path).unwrap();
    path
}
