//! Frame-free grid geometry.
//!
//! [`GridLayout`] fixes a [`GridSpec`] against a frame size and answers
//! every geometric question the partitioner and the text mapper need:
//! tile rectangles, and which column/row/tile a pixel falls in.

use serde::{Deserialize, Serialize};

use crate::error::{TileError, TileResult};
use crate::grid::GridSpec;

/// A rectangle in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    spec: GridSpec,
    width: u32,
    height: u32,
    column_width: u32,
    row_height: u32,
}

impl GridLayout {
    pub fn new(spec: GridSpec, width: u32, height: u32) -> TileResult<Self> {
        spec.validate()?;
        if width < spec.columns {
            return Err(TileError::invalid_grid(
                spec,
                format!(
                    "{} columns do not fit in a frame {} pixels wide",
                    spec.columns, width
                ),
            ));
        }
        if height < spec.rows {
            return Err(TileError::invalid_grid(
                spec,
                format!("{} rows do not fit in a frame {} pixels tall", spec.rows, height),
            ));
        }

        Ok(Self {
            spec,
            width,
            height,
            column_width: width / spec.columns,
            row_height: height / spec.rows,
        })
    }

    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_count(&self) -> u32 {
        self.spec.tile_count()
    }

    pub fn frame_rect(&self) -> TileRect {
        TileRect::new(0, 0, self.width, self.height)
    }

    /// Rectangle of the tile with the given 1-based index. The last column
    /// and the last row absorb any remainder pixels.
    pub fn rect(&self, index: u32) -> TileResult<TileRect> {
        let (row, column) = self.spec.position(index)?;
        Ok(self.rect_at(row, column))
    }

    pub(crate) fn rect_at(&self, row: u32, column: u32) -> TileRect {
        let x = column * self.column_width;
        let y = row * self.row_height;
        let width = if column + 1 == self.spec.columns {
            self.width - x
        } else {
            self.column_width
        };
        let height = if row + 1 == self.spec.rows {
            self.height - y
        } else {
            self.row_height
        };
        TileRect::new(x, y, width, height)
    }

    /// All tile rectangles in index order.
    pub fn rects(&self) -> Vec<TileRect> {
        (0..self.spec.rows)
            .flat_map(|row| (0..self.spec.columns).map(move |column| (row, column)))
            .map(|(row, column)| self.rect_at(row, column))
            .collect()
    }

    /// Column containing pixel column `x`, or `None` past the right edge.
    pub fn column_at(&self, x: u32) -> Option<u32> {
        if x >= self.width {
            return None;
        }
        Some((x / self.column_width).min(self.spec.columns - 1))
    }

    /// Row containing pixel row `y`, or `None` past the bottom edge.
    pub fn row_at(&self, y: u32) -> Option<u32> {
        if y >= self.height {
            return None;
        }
        Some((y / self.row_height).min(self.spec.rows - 1))
    }

    /// Index of the tile containing pixel (x, y).
    pub fn tile_at(&self, x: u32, y: u32) -> Option<u32> {
        let column = self.column_at(x)?;
        let row = self.row_at(y)?;
        Some(row * self.spec.columns + column + 1)
    }

    /// True when `x` sits exactly on the left edge of a column other than
    /// the first, i.e. on a boundary shared by two columns.
    pub(crate) fn is_column_boundary(&self, x: u32) -> bool {
        x > 0 && x < self.width && x % self.column_width == 0 && x / self.column_width < self.spec.columns
    }

    pub(crate) fn is_row_boundary(&self, y: u32) -> bool {
        y > 0 && y < self.height && y % self.row_height == 0 && y / self.row_height < self.spec.rows
    }
}
