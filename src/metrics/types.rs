use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timings and outcome of one pass of the capture loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureMetrics {
    pub timestamp: DateTime<Utc>,
    pub capture_ms: u64,
    pub fingerprint_ms: u64,
    pub diff_ms: u64,
    pub ocr_ms: Option<u64>,
    pub ocr_skipped_reason: Option<String>,
    pub tile_count: usize,
    pub changed_tiles: usize,
    pub total_ms: u64,
    pub cpu_percent: f32,
    pub memory_mb: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub cpu_percent: f32,
    pub memory_mb: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub system: SystemMetrics,
    pub recent_captures: Vec<CaptureMetrics>,
    pub capture_count: u64,
    pub ocr_count: u64,
    pub ocr_skip_count: u64,
    /// Captures that changed at least one tile.
    pub changed_capture_count: u64,
}
