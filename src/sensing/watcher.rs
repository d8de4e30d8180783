use std::sync::Arc;

use crate::diff::{diff, validate_threshold, DiffResult};
use crate::error::TileResult;
use crate::frame::Frame;
use crate::grid::GridSpec;
use crate::tileset::TileSet;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Holds the previous capture's tiles on behalf of a caller that diffs
/// captures one after another.
#[derive(Debug, Clone)]
pub struct TileWatcher {
    spec: GridSpec,
    threshold: f64,
    previous: Option<Arc<TileSet>>,
}

/// What one call to [`TileWatcher::observe`] produced.
#[derive(Debug, Clone)]
pub struct Observation {
    pub tiles: Arc<TileSet>,
    pub diff: DiffResult,
}

impl TileWatcher {
    pub fn new(spec: GridSpec, threshold: f64) -> TileResult<Self> {
        spec.validate()?;
        validate_threshold(threshold)?;
        Ok(Self {
            spec,
            threshold,
            previous: None,
        })
    }

    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn previous(&self) -> Option<&TileSet> {
        self.previous.as_deref()
    }

    /// Forget the previous capture; the next frame is treated as new.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Fingerprint `frame`, diff it against the previous capture and keep
    /// it as the new previous capture.
    ///
    /// The first frame, and the first frame after a resolution change,
    /// report every tile as changed.
    pub fn observe(&mut self, frame: &Frame) -> TileResult<Observation> {
        let current = TileSet::capture(frame, self.spec)?;
        self.observe_tiles(current)
    }

    /// Like [`Self::observe`] for a capture that is already fingerprinted.
    /// A set on another grid or resolution restarts the comparison.
    pub fn observe_tiles(&mut self, current: TileSet) -> TileResult<Observation> {
        let current = Arc::new(current);

        let result = match self.previous.as_deref() {
            Some(prev) if prev.is_compatible_with(&current) => {
                diff(prev, &current, self.threshold)?
            }
            Some(prev) => {
                let (pw, ph) = prev.dimensions();
                let (cw, ch) = current.dimensions();
                log_warn!(
                    "capture changed from {} at {}x{} to {} at {}x{}; discarding previous tiles",
                    prev.spec(),
                    pw,
                    ph,
                    current.spec(),
                    cw,
                    ch
                );
                DiffResult::initial(&current)
            }
            None => DiffResult::initial(&current),
        };

        log_debug!(
            "observed {} tiles, {} changed",
            current.len(),
            result.changed.len()
        );

        self.previous = Some(Arc::clone(&current));
        Ok(Observation {
            tiles: current,
            diff: result,
        })
    }
}
