use image::{DynamicImage, RgbaImage};

use crate::error::{TileError, TileResult};

/// An immutable RGBA8 snapshot of one capture.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbaImage,
}

impl Frame {
    /// Wrap a tightly packed RGBA8 buffer of `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> TileResult<Self> {
        if width == 0 || height == 0 {
            return Err(TileError::InvalidFrame(format!(
                "frame dimensions must be > 0, got {width}x{height}"
            )));
        }

        let len = pixels.len();
        let image = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
            TileError::InvalidFrame(format!(
                "buffer of {len} bytes does not hold a {width}x{height} RGBA8 frame"
            ))
        })?;
        Ok(Self { image })
    }

    pub fn from_image(image: RgbaImage) -> TileResult<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(TileError::InvalidFrame("frame image is empty".into()));
        }
        Ok(Self { image })
    }

    /// Convert any decoded image (e.g. a PNG screenshot) into a frame.
    pub fn from_dynamic(image: DynamicImage) -> TileResult<Self> {
        Self::from_image(image.into_rgba8())
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }
}
