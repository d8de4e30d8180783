use anyhow::Result;

use crate::frame::Frame;
use crate::text::TextMatch;

/// Supplies screen captures. Implementations may block; the capture loop
/// calls them from a blocking worker.
pub trait FrameSource: Send + Sync + 'static {
    fn capture(&self) -> Result<Frame>;
}

/// Runs OCR over a frame and reports boxes in frame pixel coordinates.
pub trait TextRecognizer: Send + Sync + 'static {
    fn recognize(&self, frame: &Frame) -> Result<Vec<TextMatch>>;
}
