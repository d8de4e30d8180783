use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::TileConfig;
use crate::diff::DiffResult;
use crate::frame::Frame;
use crate::metrics::{CaptureMetrics, MetricsCollector};
use crate::text::{filter_confident, map_to_tiles, TextMapping};
use crate::tileset::TileSet;

use super::source::{FrameSource, TextRecognizer};
use super::watcher::{Observation, TileWatcher};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Everything the capture loop needs, built from a [`TileConfig`].
#[derive(Clone)]
pub struct SensingContext {
    pub source: Arc<dyn FrameSource>,
    pub recognizer: Option<Arc<dyn TextRecognizer>>,
    pub config: TileConfig,
    pub interval: Duration,
    /// Bounds the frame capture and the OCR pass, each on its own.
    pub timeout: Duration,
    pub ocr_cooldown: Duration,
    pub metrics: MetricsCollector,
}

impl SensingContext {
    pub fn new(source: Arc<dyn FrameSource>, config: TileConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            recognizer: None,
            interval: config.capture_interval(),
            timeout: config.capture_timeout(),
            ocr_cooldown: config.ocr_cooldown(),
            config,
            metrics: MetricsCollector::new(),
        })
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }
}

/// One processed capture, handed to the consumer.
#[derive(Debug, Clone)]
pub struct CaptureUpdate {
    pub timestamp: DateTime<Utc>,
    pub frame: Arc<Frame>,
    pub tiles: Arc<TileSet>,
    pub diff: DiffResult,
    /// Present only when OCR ran for this capture.
    pub text: Option<Vec<TextMapping>>,
}

pub async fn sensing_loop(
    ctx: SensingContext,
    updates: mpsc::Sender<CaptureUpdate>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(ctx.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let watcher = match TileWatcher::new(ctx.config.grid, ctx.config.threshold) {
        Ok(watcher) => Arc::new(Mutex::new(watcher)),
        Err(err) => {
            log_error!("sensing loop cannot start: {err}");
            return;
        }
    };
    let mut last_ocr_time: Option<Instant> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = cancel_token.cancelled() => break,
        }

        let outcome = tokio::select! {
            outcome = perform_capture(&ctx, &watcher, &mut last_ocr_time) => outcome,
            _ = cancel_token.cancelled() => break,
        };

        match outcome {
            Ok(update) => {
                // a slow consumer must not block shutdown
                tokio::select! {
                    sent = updates.send(update) => {
                        if sent.is_err() {
                            log_info!("capture consumer dropped; sensing loop shutting down");
                            return;
                        }
                    }
                    _ = cancel_token.cancelled() => break,
                }
            }
            Err(err) => {
                log_error!("capture failed: {err:?}");
            }
        }
    }

    log_info!("sensing loop shutting down");
}

async fn perform_capture(
    ctx: &SensingContext,
    watcher: &Arc<Mutex<TileWatcher>>,
    last_ocr_time: &mut Option<Instant>,
) -> Result<CaptureUpdate> {
    let capture_start = Instant::now();
    let timestamp = Utc::now();

    let frame = tokio::time::timeout(
        ctx.timeout,
        tokio::task::spawn_blocking({
            let source = Arc::clone(&ctx.source);
            move || source.capture()
        }),
    )
    .await
    .map_err(|_| anyhow!("frame capture timed out after {:?}", ctx.timeout))?
    .context("capture worker join failed")?
    .context("frame capture failed")?;
    let frame = Arc::new(frame);
    let capture_ms = capture_start.elapsed().as_millis() as u64;

    // Once observed, the watcher has moved on to this frame: every error
    // past this point must still deliver the update.
    let (observation, fingerprint_ms, diff_ms) = tokio::task::spawn_blocking({
        let frame = Arc::clone(&frame);
        let watcher = Arc::clone(watcher);
        let spec = ctx.config.grid;
        move || -> Result<(Observation, u64, u64)> {
            let fingerprint_start = Instant::now();
            let tiles = TileSet::capture(&frame, spec)?;
            let fingerprint_ms = fingerprint_start.elapsed().as_millis() as u64;

            let diff_start = Instant::now();
            let mut watcher = watcher
                .lock()
                .map_err(|_| anyhow!("tile watcher lock poisoned"))?;
            let observation = watcher.observe_tiles(tiles)?;
            Ok((observation, fingerprint_ms, diff_start.elapsed().as_millis() as u64))
        }
    })
    .await
    .context("fingerprint worker join failed")??;

    let mut ocr_ms = None;
    let mut ocr_skipped_reason = None;
    let mut text = None;

    if let Some(recognizer) = &ctx.recognizer {
        match ocr_skip_reason(&observation.diff, last_ocr_time.as_ref(), ctx.ocr_cooldown) {
            Some(reason) => ocr_skipped_reason = Some(reason.to_string()),
            None => {
                let ocr_start = Instant::now();
                let worker = tokio::task::spawn_blocking({
                    let recognizer = Arc::clone(recognizer);
                    let frame = Arc::clone(&frame);
                    move || recognizer.recognize(&frame)
                });

                match tokio::time::timeout(ctx.timeout, worker).await {
                    Err(_) => {
                        log_warn!(
                            "ocr timed out after {:?}; delivering tiles without text",
                            ctx.timeout
                        );
                        // back off for the cooldown before trying a stalled engine again
                        *last_ocr_time = Some(Instant::now());
                        ocr_skipped_reason = Some("ocr timeout".to_string());
                    }
                    Ok(joined) => {
                        let mapped = joined
                            .context("ocr worker join failed")
                            .and_then(|recognized| recognized)
                            .and_then(|matches| {
                                let matches =
                                    filter_confident(&matches, ctx.config.min_ocr_confidence);
                                Ok(map_to_tiles(
                                    &matches,
                                    ctx.config.grid,
                                    frame.width(),
                                    frame.height(),
                                )?)
                            });

                        match mapped {
                            Ok(mappings) => {
                                let elapsed = ocr_start.elapsed().as_millis() as u64;
                                log_info!(
                                    "OCR completed: {} matches, ocr_time={}ms",
                                    mappings.len(),
                                    elapsed
                                );
                                *last_ocr_time = Some(Instant::now());
                                ocr_ms = Some(elapsed);
                                text = Some(mappings);
                            }
                            Err(err) => {
                                log_warn!(
                                    "ocr failed after {}ms: {err:#}",
                                    ocr_start.elapsed().as_millis()
                                );
                                ocr_skipped_reason = Some("ocr failed".to_string());
                            }
                        }
                    }
                }
            }
        }
    }

    let system = ctx.metrics.sample_system_metrics().await;
    let total_ms = capture_start.elapsed().as_millis() as u64;
    ctx.metrics
        .record_capture(CaptureMetrics {
            timestamp,
            capture_ms,
            fingerprint_ms,
            diff_ms,
            ocr_ms,
            ocr_skipped_reason,
            tile_count: observation.tiles.len(),
            changed_tiles: observation.diff.changed.len(),
            total_ms,
            cpu_percent: system.cpu_percent,
            memory_mb: system.memory_mb,
        })
        .await;

    log_info!(
        "Capture completed in {}ms ({}x{}, {} of {} tiles changed; capture: {}ms, fingerprint: {}ms, diff: {}ms)",
        total_ms,
        frame.width(),
        frame.height(),
        observation.diff.changed.len(),
        observation.tiles.len(),
        capture_ms,
        fingerprint_ms,
        diff_ms
    );

    Ok(CaptureUpdate {
        timestamp,
        frame,
        tiles: observation.tiles,
        diff: observation.diff,
        text,
    })
}

/// Why OCR should be skipped for this capture, or `None` to run it.
fn ocr_skip_reason(
    diff: &DiffResult,
    last_ocr_time: Option<&Instant>,
    cooldown: Duration,
) -> Option<&'static str> {
    if diff.initial || last_ocr_time.is_none() {
        return None;
    }
    if diff.is_empty() {
        return Some("no tiles changed");
    }
    if !cooldown_elapsed(last_ocr_time, cooldown) {
        return Some("cooldown");
    }
    None
}

fn cooldown_elapsed(last_ocr_time: Option<&Instant>, cooldown: Duration) -> bool {
    last_ocr_time
        .map(|instant| instant.elapsed() >= cooldown)
        .unwrap_or(true)
}
