use serde::{Deserialize, Serialize};

/// An OCR box in frame pixel coordinates. `x`/`y` may be negative or the
/// box may run past the frame; the mapper clips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero width or height; mapped as the single point (x, y).
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.x.saturating_add((self.width / 2) as i32),
            self.y.saturating_add((self.height / 2) as i32),
        )
    }
}

/// Text recognized by an external OCR engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMatch {
    pub text: String,
    pub bbox: BoundingBox,
    /// Engine confidence, 0 to 100.
    pub confidence: f32,
}

impl TextMatch {
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bbox,
            confidence: 100.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn center(&self) -> (i32, i32) {
        self.bbox.center()
    }

    /// Rescale a box found on a resized OCR input back to frame coordinates.
    pub fn scaled(&self, scale_x: f64, scale_y: f64) -> Self {
        let bbox = BoundingBox {
            x: (self.bbox.x as f64 * scale_x).round() as i32,
            y: (self.bbox.y as f64 * scale_y).round() as i32,
            width: (self.bbox.width as f64 * scale_x).round().max(0.0) as u32,
            height: (self.bbox.height as f64 * scale_y).round().max(0.0) as u32,
        };
        Self {
            text: self.text.clone(),
            bbox,
            confidence: self.confidence,
        }
    }
}
