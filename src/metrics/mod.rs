mod types;

pub use types::{CaptureMetrics, MetricsSnapshot, SystemMetrics};

use std::collections::VecDeque;
use std::sync::Arc;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::sync::Mutex;

const MAX_RECENT_CAPTURES: usize = 20;

/// Shared, cloneable recorder for capture loop timings.
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsState>>,
}

struct MetricsState {
    recent_captures: VecDeque<CaptureMetrics>,
    capture_count: u64,
    ocr_count: u64,
    ocr_skip_count: u64,
    changed_capture_count: u64,
    system: System,
    pid: Pid,
}

impl MetricsState {
    fn sample(&mut self) -> SystemMetrics {
        let pid = self.pid;
        self.system.refresh_processes(ProcessesToUpdate::Some(&[pid]));
        match self.system.process(pid) {
            Some(process) => SystemMetrics {
                cpu_percent: process.cpu_usage(),
                memory_mb: process.memory() as f64 / 1024.0 / 1024.0,
            },
            None => SystemMetrics::default(),
        }
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        let mut system = System::new();
        let pid = Pid::from_u32(std::process::id());

        // CPU usage is a delta between refreshes, so take a baseline now
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        Self {
            inner: Arc::new(Mutex::new(MetricsState {
                recent_captures: VecDeque::with_capacity(MAX_RECENT_CAPTURES),
                capture_count: 0,
                ocr_count: 0,
                ocr_skip_count: 0,
                changed_capture_count: 0,
                system,
                pid,
            })),
        }
    }

    /// Current process CPU and memory. Call once per capture.
    pub async fn sample_system_metrics(&self) -> SystemMetrics {
        self.inner.lock().await.sample()
    }

    pub async fn record_capture(&self, metrics: CaptureMetrics) {
        let mut state = self.inner.lock().await;

        state.capture_count += 1;
        if metrics.ocr_ms.is_some() {
            state.ocr_count += 1;
        } else if metrics.ocr_skipped_reason.is_some() {
            state.ocr_skip_count += 1;
        }
        if metrics.changed_tiles > 0 {
            state.changed_capture_count += 1;
        }

        if state.recent_captures.len() == MAX_RECENT_CAPTURES {
            state.recent_captures.pop_front();
        }
        state.recent_captures.push_back(metrics);
    }

    pub async fn snapshot(&self) -> MetricsSnapshot {
        let mut state = self.inner.lock().await;
        let system = state.sample();

        MetricsSnapshot {
            system,
            recent_captures: state.recent_captures.iter().cloned().collect(),
            capture_count: state.capture_count,
            ocr_count: state.ocr_count,
            ocr_skip_count: state.ocr_skip_count,
            changed_capture_count: state.changed_capture_count,
        }
    }

    pub async fn reset(&self) {
        let mut state = self.inner.lock().await;
        state.recent_captures.clear();
        state.capture_count = 0;
        state.ocr_count = 0;
        state.ocr_skip_count = 0;
        state.changed_capture_count = 0;
        // re-establish the CPU baseline
        state.sample();
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
