use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{TileError, TileResult};
use crate::fingerprint::distance;
use crate::tileset::TileSet;

// Per-tile distances are noisy at debug level; flip on when tuning thresholds
const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// Tiles judged changed between two captures, with every tile's distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Changed tile indices, ascending.
    pub changed: Vec<u32>,
    /// Distance of every tile, changed or not.
    pub distances: BTreeMap<u32, f64>,
    pub threshold: f64,
    /// No previous capture existed; every tile is reported as changed.
    #[serde(default)]
    pub initial: bool,
}

impl DiffResult {
    /// Result for a first capture: everything is new.
    pub fn initial(current: &TileSet) -> Self {
        let distances: BTreeMap<u32, f64> =
            current.tiles().iter().map(|t| (t.index, 1.0)).collect();
        Self {
            changed: distances.keys().copied().collect(),
            distances,
            threshold: 0.0,
            initial: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn is_changed(&self, index: u32) -> bool {
        self.changed.binary_search(&index).is_ok()
    }

    pub fn distance(&self, index: u32) -> Option<f64> {
        self.distances.get(&index).copied()
    }

    /// Indices that stayed within the threshold, ascending.
    pub fn unchanged(&self) -> Vec<u32> {
        self.distances
            .keys()
            .copied()
            .filter(|index| !self.is_changed(*index))
            .collect()
    }

    /// Re-derive the changed set at another threshold from the stored
    /// distances, without touching any pixels.
    pub fn rethreshold(&self, threshold: f64) -> TileResult<Self> {
        validate_threshold(threshold)?;
        if self.initial {
            return Ok(Self {
                threshold,
                ..self.clone()
            });
        }
        Ok(Self {
            changed: changed_indices(&self.distances, threshold),
            distances: self.distances.clone(),
            threshold,
            initial: false,
        })
    }
}

pub fn validate_threshold(threshold: f64) -> TileResult<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(TileError::InvalidThreshold(threshold));
    }
    Ok(())
}

/// Compare two captures tile by tile. A tile is changed when its
/// fingerprint distance is strictly greater than `threshold`.
pub fn diff(previous: &TileSet, current: &TileSet, threshold: f64) -> TileResult<DiffResult> {
    validate_threshold(threshold)?;

    if !previous.is_compatible_with(current) || previous.len() != current.len() {
        let (prev_width, prev_height) = previous.dimensions();
        let (cur_width, cur_height) = current.dimensions();
        return Err(TileError::IncompatiblePartition {
            prev_spec: previous.spec(),
            prev_width,
            prev_height,
            cur_spec: current.spec(),
            cur_width,
            cur_height,
        });
    }

    let distances: BTreeMap<u32, f64> = previous
        .tiles()
        .iter()
        .zip(current.tiles())
        .map(|(prev, cur)| {
            let d = distance(&prev.fingerprint, &cur.fingerprint);
            log_debug!("tile {} ({}) distance {:.4}", cur.index, cur.label(), d);
            (cur.index, d)
        })
        .collect();

    let changed = changed_indices(&distances, threshold);
    log_debug!(
        "diff at threshold {:.3}: {} of {} tiles changed",
        threshold,
        changed.len(),
        distances.len()
    );

    Ok(DiffResult {
        changed,
        distances,
        threshold,
        initial: false,
    })
}

fn changed_indices(distances: &BTreeMap<u32, f64>, threshold: f64) -> Vec<u32> {
    distances
        .iter()
        .filter(|(_, d)| **d > threshold)
        .map(|(index, _)| *index)
        .collect()
}
