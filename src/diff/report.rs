use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diff::DiffResult;
use crate::error::{TileError, TileResult};
use crate::fingerprint::TileStats;
use crate::frame::Frame;
use crate::grid::{partition, GridSpec, TileRect};

/// How many changed tiles a consumer should always read.
pub const REQUIRED_TILE_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDetail {
    pub index: u32,
    pub label: String,
    pub rect: TileRect,
    pub distance: f64,
    /// Tile had no previous capture to compare against.
    pub new: bool,
    pub stats: TileStats,
    pub hint: Option<String>,
}

/// Which tiles a consumer should look at, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRecommendation {
    pub required: Vec<u32>,
    pub optional: Vec<u32>,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    pub generated_at: DateTime<Utc>,
    pub grid: GridSpec,
    pub width: u32,
    pub height: u32,
    pub threshold: f64,
    pub changed: Vec<u32>,
    pub unchanged_count: usize,
    /// Details of changed tiles only.
    pub tiles: Vec<TileDetail>,
    pub recommendation: ReadRecommendation,
}

impl DiffReport {
    /// Summarize `result` using the pixels of the capture it was computed for.
    pub fn new(result: &DiffResult, frame: &Frame, spec: GridSpec) -> TileResult<Self> {
        let tiles = partition(frame, spec)?;
        if tiles.len() != result.distances.len() {
            return Err(TileError::invalid_grid(
                spec,
                format!(
                    "diff covers {} tiles but the grid has {}",
                    result.distances.len(),
                    tiles.len()
                ),
            ));
        }

        let details = result
            .changed
            .iter()
            .map(|&index| {
                spec.check_index(index)?;
                let tile = &tiles[(index - 1) as usize];
                let stats = TileStats::compute(tile);
                Ok(TileDetail {
                    index,
                    label: tile.label(),
                    rect: tile.rect,
                    distance: result.distance(index).unwrap_or(1.0),
                    new: result.initial,
                    hint: describe(&stats),
                    stats,
                })
            })
            .collect::<TileResult<Vec<_>>>()?;

        let unchanged_count = result.unchanged().len();
        let split = result.changed.len().min(REQUIRED_TILE_COUNT);

        Ok(Self {
            generated_at: Utc::now(),
            grid: spec,
            width: frame.width(),
            height: frame.height(),
            threshold: result.threshold,
            changed: result.changed.clone(),
            unchanged_count,
            tiles: details,
            recommendation: ReadRecommendation {
                required: result.changed[..split].to_vec(),
                optional: result.changed[split..].to_vec(),
                skipped: unchanged_count,
            },
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn describe(stats: &TileStats) -> Option<String> {
    let mut hint = if stats.is_dark() {
        Some("dark background (code or terminal)".to_string())
    } else if stats.is_light() {
        Some("light background (dialog or input field)".to_string())
    } else {
        None
    };

    if stats.has_alert_red() {
        let base = hint.take().map(|h| format!("{h}; ")).unwrap_or_default();
        hint = Some(format!("{base}red detected (possible error)"));
    }
    hint
}
