use crate::error::TileResult;
use crate::fingerprint::{fingerprint, Fingerprint};
use crate::frame::Frame;
use crate::grid::partition::{partition_with_layout, tile_label};
use crate::grid::{GridLayout, GridSpec, TileRect};

/// Geometry and fingerprint of one tile, detached from the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TileFingerprint {
    pub index: u32,
    pub row: u32,
    pub column: u32,
    pub rect: TileRect,
    pub fingerprint: Fingerprint,
}

impl TileFingerprint {
    pub fn label(&self) -> String {
        tile_label(self.row, self.column)
    }
}

/// A partitioned and fingerprinted capture. Owns no pixels, so a caller can
/// keep it as "the previous capture" after the frame itself is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSet {
    spec: GridSpec,
    width: u32,
    height: u32,
    tiles: Vec<TileFingerprint>,
}

impl TileSet {
    pub fn capture(frame: &Frame, spec: GridSpec) -> TileResult<Self> {
        let layout = GridLayout::new(spec, frame.width(), frame.height())?;
        let tiles = partition_with_layout(frame, &layout)
            .iter()
            .map(|tile| TileFingerprint {
                index: tile.index,
                row: tile.row,
                column: tile.column,
                rect: tile.rect,
                fingerprint: fingerprint(tile),
            })
            .collect();

        Ok(Self {
            spec,
            width: frame.width(),
            height: frame.height(),
            tiles,
        })
    }

    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn tiles(&self) -> &[TileFingerprint] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Look up a tile by its 1-based index.
    pub fn get(&self, index: u32) -> TileResult<&TileFingerprint> {
        self.spec.check_index(index)?;
        Ok(&self.tiles[(index - 1) as usize])
    }

    /// Same grid and same frame resolution, so tiles line up one to one.
    pub fn is_compatible_with(&self, other: &TileSet) -> bool {
        self.spec == other.spec && self.width == other.width && self.height == other.height
    }
}
