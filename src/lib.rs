//! Split screen captures into a fixed grid of tiles, find which tiles
//! changed since the last capture, and locate OCR text on the grid, so only
//! the relevant part of a screen has to be sent to a vision model.
//!
//! ```no_run
//! use tilewatch::{diff, map_to_tiles, BoundingBox, Frame, GridSpec, TextMatch, TileSet};
//!
//! # fn main() -> Result<(), tilewatch::TileError> {
//! # let (before, after) = (vec![0u8; 1920 * 1080 * 4], vec![0u8; 1920 * 1080 * 4]);
//! let spec = GridSpec::default(); // 6 columns x 4 rows
//! let prev = TileSet::capture(&Frame::from_rgba(1920, 1080, before)?, spec)?;
//! let cur = TileSet::capture(&Frame::from_rgba(1920, 1080, after)?, spec)?;
//! let changed = diff(&prev, &cur, 0.1)?.changed;
//!
//! let ok_button = TextMatch::new("OK", BoundingBox::new(900, 600, 60, 24));
//! let tiles = map_to_tiles(&[ok_button], spec, 1920, 1080)?;
//! # let _ = (changed, tiles);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diff;
mod error;
pub mod fingerprint;
mod frame;
pub mod grid;
pub mod metrics;
pub mod sensing;
pub mod text;
mod tileset;
pub mod utils;

pub use config::{SettingsStore, TileConfig};
pub use diff::{diff, DiffReport, DiffResult};
pub use error::{TileError, TileResult};
pub use fingerprint::{distance, fingerprint, Fingerprint, TileStats};
pub use frame::Frame;
pub use grid::{partition, GridLayout, GridSpec, Tile, TileRect};
pub use text::{map_to_tiles, BoundingBox, TextMapping, TextMatch};
pub use tileset::{TileFingerprint, TileSet};
pub use utils::init_logging;
