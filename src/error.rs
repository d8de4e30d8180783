use thiserror::Error;

use crate::grid::GridSpec;

/// Errors raised by the tiling core. Every variant is a precondition
/// violation, so none of them are worth retrying with the same inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TileError {
    #[error("invalid grid {spec}: {reason}")]
    InvalidGrid { spec: GridSpec, reason: String },

    /// Tile sets were produced from different grids or frame sizes.
    /// Contains the (spec, width, height) of the previous and current set.
    #[error(
        "cannot diff tile sets from {prev_spec} at {prev_width}x{prev_height} \
         against {cur_spec} at {cur_width}x{cur_height}"
    )]
    IncompatiblePartition {
        prev_spec: GridSpec,
        prev_width: u32,
        prev_height: u32,
        cur_spec: GridSpec,
        cur_width: u32,
        cur_height: u32,
    },

    #[error("diff threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("tile index {index} is outside 1..={count}")]
    TileIndexOutOfRange { index: u32, count: u32 },

    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

impl TileError {
    pub(crate) fn invalid_grid(spec: GridSpec, reason: impl Into<String>) -> Self {
        Self::InvalidGrid {
            spec,
            reason: reason.into(),
        }
    }
}

pub type TileResult<T> = Result<T, TileError>;
