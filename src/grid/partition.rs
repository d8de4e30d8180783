use image::{imageops, RgbaImage, SubImage};

use crate::error::TileResult;
use crate::frame::Frame;
use crate::grid::{GridLayout, GridSpec, TileRect};

/// One cell of the grid, borrowing its pixels from the owning frame.
#[derive(Debug, Clone, Copy)]
pub struct Tile<'a> {
    pub index: u32,
    pub row: u32,
    pub column: u32,
    pub rect: TileRect,
    frame: &'a Frame,
}

impl<'a> Tile<'a> {
    pub fn frame(&self) -> &'a Frame {
        self.frame
    }

    /// Zero-copy view of the tile's pixels.
    pub fn view(&self) -> SubImage<&'a RgbaImage> {
        imageops::crop_imm(
            self.frame.image(),
            self.rect.x,
            self.rect.y,
            self.rect.width,
            self.rect.height,
        )
    }

    /// Copy the tile's pixels out, e.g. to encode and send them onward.
    pub fn to_image(&self) -> RgbaImage {
        self.view().to_image()
    }

    /// `r{row}_c{column}`, 0-based.
    pub fn label(&self) -> String {
        tile_label(self.row, self.column)
    }
}

pub(crate) fn tile_label(row: u32, column: u32) -> String {
    format!("r{row}_c{column}")
}

/// Split `frame` into `spec.rows * spec.columns` tiles in row-major order.
pub fn partition(frame: &Frame, spec: GridSpec) -> TileResult<Vec<Tile<'_>>> {
    let layout = GridLayout::new(spec, frame.width(), frame.height())?;
    Ok(partition_with_layout(frame, &layout))
}

pub(crate) fn partition_with_layout<'a>(frame: &'a Frame, layout: &GridLayout) -> Vec<Tile<'a>> {
    let spec = layout.spec();
    let mut tiles = Vec::with_capacity(spec.tile_count() as usize);
    for row in 0..spec.rows {
        for column in 0..spec.columns {
            tiles.push(Tile {
                index: row * spec.columns + column + 1,
                row,
                column,
                rect: layout.rect_at(row, column),
                frame,
            });
        }
    }
    tiles
}
