#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use tilewatch::{Frame, TileRect};

/// Deterministic busy pattern, so every tile has gradients and mid tones.
pub fn textured_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let v = ((x * 7 + y * 13) ^ (x.wrapping_mul(y) >> 3)) % 256;
        let v = v as u8;
        Rgba([v, v.wrapping_add(40), 255 - v, 255])
    })
}

pub fn textured(width: u32, height: u32) -> Frame {
    Frame::from_image(textured_image(width, height)).unwrap()
}

pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Frame {
    Frame::from_image(RgbaImage::from_pixel(width, height, Rgba(color))).unwrap()
}

/// Copy of `image` with `rect` painted in `color`.
pub fn with_patch(image: &RgbaImage, rect: TileRect, color: [u8; 4]) -> Frame {
    let mut patched = image.clone();
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            patched.put_pixel(x, y, Rgba(color));
        }
    }
    Frame::from_image(patched).unwrap()
}
