//! Colour metadata for a tile, attached to changed tiles in diff reports so
//! a consumer can guess what a region holds without looking at it.

use image::imageops::{self, FilterType};
use image::{GenericImageView, Pixel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::grid::Tile;

const DOMINANT_SAMPLE_SIZE: u32 = 50;
const DOMINANT_COLOR_COUNT: usize = 3;
const QUANTIZE_STEP: u8 = 16;
const DARK_LIMIT: u8 = 85;
const LIGHT_LIMIT: u8 = 170;

/// Share of pixels per luminance band; the three fields sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRatio {
    pub dark: f64,
    pub mid: f64,
    pub light: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileStats {
    /// Most frequent quantized colours as `#RRGGBB`, most frequent first.
    pub dominant_colors: Vec<String>,
    /// Mean luminance in [0, 1].
    pub brightness: f64,
    pub color_ratio: ColorRatio,
}

impl TileStats {
    pub fn compute(tile: &Tile<'_>) -> Self {
        let view = tile.view();

        let mut luma_sum: u64 = 0;
        let (mut dark, mut mid, mut light) = (0u64, 0u64, 0u64);
        for (_, _, pixel) in view.pixels() {
            let luma = pixel.to_luma()[0];
            luma_sum += luma as u64;
            match luma {
                l if l < DARK_LIMIT => dark += 1,
                l if l < LIGHT_LIMIT => mid += 1,
                _ => light += 1,
            }
        }

        let total = tile.rect.area().max(1) as f64;
        Self {
            dominant_colors: dominant_colors(tile),
            brightness: luma_sum as f64 / (total * 255.0),
            color_ratio: ColorRatio {
                dark: dark as f64 / total,
                mid: mid as f64 / total,
                light: light as f64 / total,
            },
        }
    }

    /// Mostly dark tiles are usually code editors or terminals.
    pub fn is_dark(&self) -> bool {
        self.color_ratio.dark > 0.7
    }

    /// Mostly light tiles are usually dialogs or input fields.
    pub fn is_light(&self) -> bool {
        self.color_ratio.light > 0.7
    }

    /// A strongly red dominant colour often means an error indicator.
    pub fn has_alert_red(&self) -> bool {
        self.dominant_colors
            .iter()
            .any(|c| matches!(c.as_str(), "#F00000" | "#E00000" | "#D00000"))
    }
}

fn dominant_colors(tile: &Tile<'_>) -> Vec<String> {
    let sample = imageops::resize(
        &tile.to_image(),
        DOMINANT_SAMPLE_SIZE,
        DOMINANT_SAMPLE_SIZE,
        FilterType::Lanczos3,
    );

    let mut counts: HashMap<[u8; 3], usize> = HashMap::new();
    for pixel in sample.pixels() {
        let [r, g, b, _] = pixel.0;
        let key = [quantize(r), quantize(g), quantize(b)];
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut ranked: Vec<([u8; 3], usize)> = counts.into_iter().collect();
    // count descending, then colour value so ties are deterministic
    ranked.sort_by(|(ca, na), (cb, nb)| nb.cmp(na).then(ca.cmp(cb)));
    ranked
        .into_iter()
        .take(DOMINANT_COLOR_COUNT)
        .map(|([r, g, b], _)| format!("#{r:02X}{g:02X}{b:02X}"))
        .collect()
}

fn quantize(channel: u8) -> u8 {
    channel / QUANTIZE_STEP * QUANTIZE_STEP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::grid::{partition, GridSpec};
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32, color: [u8; 4]) -> Frame {
        Frame::from_image(RgbaImage::from_pixel(width, height, Rgba(color))).unwrap()
    }

    #[test]
    fn quantize_drops_low_bits() {
        assert_eq!(quantize(0), 0);
        assert_eq!(quantize(15), 0);
        assert_eq!(quantize(16), 16);
        assert_eq!(quantize(255), 240);
    }

    #[test]
    fn black_tile_is_dark() {
        let frame = solid(60, 40, [0, 0, 0, 255]);
        let tiles = partition(&frame, GridSpec::new(2, 2)).unwrap();
        let stats = TileStats::compute(&tiles[0]);
        assert_eq!(stats.brightness, 0.0);
        assert_eq!(stats.color_ratio.dark, 1.0);
        assert!(stats.is_dark());
        assert!(!stats.is_light());
        assert_eq!(stats.dominant_colors, vec!["#000000".to_string()]);
    }

    #[test]
    fn white_tile_is_light() {
        let frame = solid(60, 40, [255, 255, 255, 255]);
        let tiles = partition(&frame, GridSpec::new(2, 2)).unwrap();
        let stats = TileStats::compute(&tiles[3]);
        assert!(stats.brightness > 0.99);
        assert_eq!(stats.color_ratio.light, 1.0);
        assert!(stats.is_light());
        assert_eq!(stats.dominant_colors, vec!["#F0F0F0".to_string()]);
    }

    #[test]
    fn pure_red_is_flagged() {
        let frame = solid(20, 20, [255, 0, 0, 255]);
        let tiles = partition(&frame, GridSpec::new(1, 1)).unwrap();
        let stats = TileStats::compute(&tiles[0]);
        assert_eq!(stats.dominant_colors, vec!["#F00000".to_string()]);
        assert!(stats.has_alert_red());
    }
}
