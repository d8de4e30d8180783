use image::DynamicImage;
use image_hasher::{HashAlg, Hasher, HasherConfig, ImageHash};

const HASH_WIDTH: u32 = 8;
const HASH_HEIGHT: u32 = 8;

fn tile_hasher() -> Hasher {
    // Gradient is dHash: adjacent-pixel brightness comparisons on a 9x8 downsample.
    HasherConfig::new()
        .hash_alg(HashAlg::Gradient)
        .hash_size(HASH_WIDTH, HASH_HEIGHT)
        .to_hasher()
}

pub fn compute_tile_hash(image: &DynamicImage) -> ImageHash {
    tile_hasher().hash_image(image)
}

/// Hamming distance divided by the hash length, in [0, 1].
pub fn normalized_hash_distance(lhs: &ImageHash, rhs: &ImageHash) -> f64 {
    let bits = lhs.as_bytes().len() * 8;
    if bits == 0 || lhs.as_bytes().len() != rhs.as_bytes().len() {
        return 1.0;
    }
    (lhs.dist(rhs) as f64 / bits as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn striped(width: u32, height: u32, flip: bool) -> DynamicImage {
        let img = RgbaImage::from_fn(width, height, |x, _| {
            let bright = (x / 4) % 2 == 0;
            if bright ^ flip {
                Rgba([240, 240, 240, 255])
            } else {
                Rgba([10, 10, 10, 255])
            }
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn identical_images_hash_equal() {
        let a = compute_tile_hash(&striped(64, 48, false));
        let b = compute_tile_hash(&striped(64, 48, false));
        assert_eq!(a, b);
        assert_eq!(normalized_hash_distance(&a, &b), 0.0);
    }

    #[test]
    fn hash_is_64_bits() {
        let hash = compute_tile_hash(&striped(64, 48, false));
        assert_eq!(hash.as_bytes().len(), 8);
    }

    #[test]
    fn distance_stays_normalized() {
        let a = compute_tile_hash(&striped(64, 48, false));
        let b = compute_tile_hash(&striped(64, 48, true));
        let d = normalized_hash_distance(&a, &b);
        assert!((0.0..=1.0).contains(&d));
    }
}
