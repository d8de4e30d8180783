use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::TileResult;
use crate::grid::{GridLayout, GridSpec};
use crate::text::{BoundingBox, TextMatch};

/// A text match and every tile its box overlaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMapping {
    pub text_match: TextMatch,
    pub tiles: BTreeSet<u32>,
}

impl TextMapping {
    /// Box was entirely off screen.
    pub fn is_off_screen(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Map each match onto the tiles of a `spec` grid laid over a
/// `width` x `height` frame. Output order follows input order.
pub fn map_to_tiles(
    matches: &[TextMatch],
    spec: GridSpec,
    width: u32,
    height: u32,
) -> TileResult<Vec<TextMapping>> {
    let layout = GridLayout::new(spec, width, height)?;
    Ok(matches
        .iter()
        .map(|m| TextMapping {
            text_match: m.clone(),
            tiles: tiles_for_box(&layout, &m.bbox),
        })
        .collect())
}

pub fn tiles_for_box(layout: &GridLayout, bbox: &BoundingBox) -> BTreeSet<u32> {
    if bbox.is_degenerate() {
        return tile_for_point(layout, bbox.x, bbox.y).into_iter().collect();
    }

    // clip the half-open box to [0, W) x [0, H)
    let x0 = (bbox.x as i64).max(0);
    let y0 = (bbox.y as i64).max(0);
    let x1 = (bbox.x as i64 + bbox.width as i64).min(layout.width() as i64);
    let y1 = (bbox.y as i64 + bbox.height as i64).min(layout.height() as i64);
    if x0 >= x1 || y0 >= y1 {
        return BTreeSet::new();
    }

    let (Some(first_col), Some(last_col), Some(first_row), Some(last_row)) = (
        layout.column_at(x0 as u32),
        layout.column_at((x1 - 1) as u32),
        layout.row_at(y0 as u32),
        layout.row_at((y1 - 1) as u32),
    ) else {
        return BTreeSet::new();
    };

    let columns = layout.spec().columns;
    (first_row..=last_row)
        .flat_map(|row| (first_col..=last_col).map(move |col| row * columns + col + 1))
        .collect()
}

/// A point on a shared boundary belongs to the tile above / to the left.
fn tile_for_point(layout: &GridLayout, x: i32, y: i32) -> Option<u32> {
    if x < 0 || y < 0 {
        return None;
    }
    let (x, y) = (x as u32, y as u32);

    let mut column = layout.column_at(x)?;
    if layout.is_column_boundary(x) {
        column -= 1;
    }
    let mut row = layout.row_at(y)?;
    if layout.is_row_boundary(y) {
        row -= 1;
    }
    Some(row * layout.spec().columns + column + 1)
}
