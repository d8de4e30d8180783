//! Periodic capture driving the tiling core.
//!
//! Nothing here is needed to use the core; it is the loop a screen-watching
//! agent would otherwise write itself: capture every few seconds, diff
//! against the last capture, OCR when something moved, hand results on.

pub mod controller;
pub mod loop_worker;
pub mod source;
pub mod watcher;

pub use controller::SensingController;
pub use loop_worker::{sensing_loop, CaptureUpdate, SensingContext};
pub use source::{FrameSource, TextRecognizer};
pub use watcher::{Observation, TileWatcher};
