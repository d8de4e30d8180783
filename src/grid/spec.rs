use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TileError, TileResult};

pub const DEFAULT_ROWS: u32 = 4;
pub const DEFAULT_COLUMNS: u32 = 6;

/// Row and column counts of the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: u32,
    pub columns: u32,
}

impl GridSpec {
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// `rows * columns`, saturating for grids that fail [`Self::validate`].
    pub fn tile_count(&self) -> u32 {
        self.rows.saturating_mul(self.columns)
    }

    pub fn validate(&self) -> TileResult<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(TileError::invalid_grid(
                *self,
                "rows and columns must be at least 1",
            ));
        }
        if self.rows.checked_mul(self.columns).is_none() {
            return Err(TileError::invalid_grid(
                *self,
                "tile count does not fit in 32 bits",
            ));
        }
        Ok(())
    }

    /// Convert a 1-based tile index into its 0-based (row, column).
    pub fn position(&self, index: u32) -> TileResult<(u32, u32)> {
        self.check_index(index)?;
        let zero_based = index - 1;
        Ok((zero_based / self.columns, zero_based % self.columns))
    }

    /// Row-major 1-based index of the tile at (row, column).
    pub fn index_of(&self, row: u32, column: u32) -> TileResult<u32> {
        self.validate()?;
        if row >= self.rows || column >= self.columns {
            return Err(TileError::TileIndexOutOfRange {
                index: row.saturating_mul(self.columns).saturating_add(column).saturating_add(1),
                count: self.tile_count(),
            });
        }
        Ok(row * self.columns + column + 1)
    }

    pub fn check_index(&self, index: u32) -> TileResult<()> {
        self.validate()?;
        let count = self.tile_count();
        if index == 0 || index > count {
            return Err(TileError::TileIndexOutOfRange { index, count });
        }
        Ok(())
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLUMNS)
    }
}

impl fmt::Display for GridSpec {
    // Columns first, matching how screen grids are usually described (6x4).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}
