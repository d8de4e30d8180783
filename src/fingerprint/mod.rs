//! Compact, comparable summaries of tile content.
//!
//! A [`Fingerprint`] pairs a 64-bit gradient hash with an 8x8 luminance
//! thumbnail. Both are computed on a fixed downsampled resolution, so
//! [`distance`] means the same thing for a 320x270 tile as for the wider
//! tile that absorbed the frame's remainder pixels.

pub mod phash;
pub mod stats;

use image::imageops::FilterType;
use image::DynamicImage;
use image_hasher::ImageHash;

use crate::grid::Tile;

pub use stats::{ColorRatio, TileStats};

const LUMA_SIDE: u32 = 8;
const LUMA_CELLS: usize = (LUMA_SIDE * LUMA_SIDE) as usize;

/// Thumbnail contrast (max - min luma) at which the hash term counts fully.
/// Below it, gradient bits are mostly rounding noise and are scaled down.
const FULL_CONTRAST: u8 = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    hash: ImageHash,
    luma: [u8; LUMA_CELLS],
}

impl Fingerprint {
    pub fn hash(&self) -> &ImageHash {
        &self.hash
    }

    pub fn luma(&self) -> &[u8; LUMA_CELLS] {
        &self.luma
    }

    pub fn to_base64(&self) -> String {
        self.hash.to_base64()
    }

    /// Spread between the brightest and darkest thumbnail cell.
    pub fn contrast(&self) -> u8 {
        let max = self.luma.iter().copied().max().unwrap_or(0);
        let min = self.luma.iter().copied().min().unwrap_or(0);
        max - min
    }
}

pub fn fingerprint(tile: &Tile<'_>) -> Fingerprint {
    let image = DynamicImage::ImageRgba8(tile.to_image());
    let hash = phash::compute_tile_hash(&image);

    let thumb = image
        .resize_exact(LUMA_SIDE, LUMA_SIDE, FilterType::Triangle)
        .to_luma8();
    let mut luma = [0u8; LUMA_CELLS];
    luma.copy_from_slice(thumb.as_raw());

    Fingerprint { hash, luma }
}

/// Distance between two fingerprints in [0, 1]; 0 means identical.
///
/// The larger of the normalized hash distance (structure moved) and the
/// mean absolute luminance delta (brightness changed). A flat fill has no
/// gradients, so the hash alone would miss a tile repainted in one colour.
///
/// On near-flat tiles every gradient comparison sits on a rounding edge and
/// one level of dither flips half the bits, so the hash term is weighted by
/// the higher of the two thumbnails' contrast and fades out below
/// [`FULL_CONTRAST`].
pub fn distance(a: &Fingerprint, b: &Fingerprint) -> f64 {
    let contrast = a.contrast().max(b.contrast());
    let hash_weight = (contrast as f64 / FULL_CONTRAST as f64).min(1.0);
    let hash_distance = phash::normalized_hash_distance(&a.hash, &b.hash) * hash_weight;

    let luma_delta: u32 = a
        .luma
        .iter()
        .zip(b.luma.iter())
        .map(|(&x, &y)| (x as i32 - y as i32).unsigned_abs())
        .sum();
    let luma_distance = luma_delta as f64 / (LUMA_CELLS as f64 * 255.0);
    hash_distance.max(luma_distance).clamp(0.0, 1.0)
}
