mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tilewatch::metrics::MetricsCollector;
use tilewatch::sensing::{
    FrameSource, SensingContext, SensingController, TextRecognizer, TileWatcher,
};
use tilewatch::{BoundingBox, Frame, GridSpec, TextMatch, TileConfig, TileError, TileRect};

// --- TileWatcher ---

#[test]
fn test_watcher_first_frame_is_initial() {
    let mut watcher = TileWatcher::new(GridSpec::default(), 0.1).unwrap();
    let frame = common::textured(120, 80);
    let observation = watcher.observe(&frame).unwrap();
    assert!(observation.diff.initial);
    assert_eq!(observation.diff.changed.len(), 24);
    assert!(watcher.previous().is_some());
}

#[test]
fn test_watcher_reports_only_changed_tiles() {
    let mut watcher = TileWatcher::new(GridSpec::default(), 0.0).unwrap();
    let image = common::textured_image(120, 80);
    let before = Frame::from_image(image.clone()).unwrap();
    let after = common::with_patch(&image, TileRect::new(42, 22, 15, 15), [255, 0, 0, 255]);

    watcher.observe(&before).unwrap();
    let same = watcher.observe(&before).unwrap();
    assert!(same.diff.is_empty());
    assert!(!same.diff.initial);

    // 120x80 over 6x4 gives 20x20 tiles; (42, 22) is row 1, column 2
    let changed = watcher.observe(&after).unwrap();
    assert_eq!(changed.diff.changed, vec![9]);
}

#[test]
fn test_watcher_restarts_after_resolution_change() {
    let mut watcher = TileWatcher::new(GridSpec::default(), 0.1).unwrap();
    watcher.observe(&common::textured(120, 80)).unwrap();
    let resized = watcher.observe(&common::textured(240, 160)).unwrap();
    assert!(resized.diff.initial);
    assert_eq!(watcher.previous().unwrap().dimensions(), (240, 160));
}

#[test]
fn test_watcher_reset_forgets_previous() {
    let mut watcher = TileWatcher::new(GridSpec::default(), 0.1).unwrap();
    let frame = common::textured(120, 80);
    watcher.observe(&frame).unwrap();
    watcher.reset();
    assert!(watcher.previous().is_none());
    assert!(watcher.observe(&frame).unwrap().diff.initial);
}

#[test]
fn test_watcher_rejects_bad_settings() {
    assert!(matches!(
        TileWatcher::new(GridSpec::default(), 2.0),
        Err(TileError::InvalidThreshold(_))
    ));
    assert!(matches!(
        TileWatcher::new(GridSpec::new(0, 0), 0.1),
        Err(TileError::InvalidGrid { .. })
    ));
}

// --- Capture loop ---

/// Plays back a fixed list of frames, then repeats the last one.
struct ScriptedSource {
    frames: Vec<Frame>,
    next: AtomicUsize,
}

impl FrameSource for ScriptedSource {
    fn capture(&self) -> Result<Frame> {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        Ok(self.frames[i.min(self.frames.len() - 1)].clone())
    }
}

struct FixedRecognizer;

impl TextRecognizer for FixedRecognizer {
    fn recognize(&self, _frame: &Frame) -> Result<Vec<TextMatch>> {
        Ok(vec![
            TextMatch::new("Save", BoundingBox::new(2, 2, 12, 8)).with_confidence(90.0),
            TextMatch::new("~", BoundingBox::new(50, 50, 4, 4)).with_confidence(5.0),
        ])
    }
}

fn fast_context(source: ScriptedSource, metrics: MetricsCollector) -> SensingContext {
    let mut ctx = SensingContext::new(Arc::new(source), TileConfig::default())
        .unwrap()
        .with_recognizer(Arc::new(FixedRecognizer))
        .with_metrics(metrics);
    ctx.interval = Duration::from_millis(10);
    ctx.timeout = Duration::from_secs(5);
    ctx.ocr_cooldown = Duration::from_secs(3600);
    ctx
}

#[tokio::test]
async fn test_loop_streams_diffs_and_gates_ocr() {
    let image = common::textured_image(120, 80);
    let source = ScriptedSource {
        frames: vec![
            Frame::from_image(image.clone()).unwrap(),
            Frame::from_image(image.clone()).unwrap(),
            common::with_patch(&image, TileRect::new(0, 0, 20, 20), [255, 255, 255, 255]),
        ],
        next: AtomicUsize::new(0),
    };
    let metrics = MetricsCollector::new();
    let mut controller = SensingController::new();
    let mut updates = controller
        .start_sensing(fast_context(source, metrics.clone()))
        .unwrap();
    assert!(controller.is_running());

    let first = updates.recv().await.unwrap();
    assert!(first.diff.initial);
    assert_eq!(first.tiles.len(), 24);
    let text = first.text.expect("first capture runs OCR");
    assert_eq!(text.len(), 1);
    assert_eq!(text[0].text_match.text, "Save");
    assert_eq!(text[0].tiles.iter().copied().collect::<Vec<_>>(), vec![1]);

    let second = updates.recv().await.unwrap();
    assert!(second.diff.is_empty());
    assert!(second.text.is_none());

    let third = updates.recv().await.unwrap();
    assert_eq!(third.diff.changed, vec![1]);
    assert!(third.text.is_none(), "cooldown blocks the second OCR pass");

    controller.stop_sensing().await.unwrap();
    assert!(!controller.is_running());

    let snapshot = metrics.snapshot().await;
    assert!(snapshot.capture_count >= 3);
    assert_eq!(snapshot.ocr_count, 1);
    assert!(snapshot.ocr_skip_count >= 2);
}

#[tokio::test]
async fn test_controller_refuses_double_start() {
    let source = ScriptedSource {
        frames: vec![common::textured(120, 80)],
        next: AtomicUsize::new(0),
    };
    let mut controller = SensingController::new();
    let _updates = controller
        .start_sensing(fast_context(source, MetricsCollector::new()))
        .unwrap();

    let again = ScriptedSource {
        frames: vec![common::textured(120, 80)],
        next: AtomicUsize::new(0),
    };
    assert!(controller
        .start_sensing(fast_context(again, MetricsCollector::new()))
        .is_err());

    controller.stop_sensing().await.unwrap();
}

#[tokio::test]
async fn test_loop_stops_when_consumer_goes_away() {
    let source = ScriptedSource {
        frames: vec![common::textured(120, 80)],
        next: AtomicUsize::new(0),
    };
    let mut controller = SensingController::new();
    let updates = controller
        .start_sensing(fast_context(source, MetricsCollector::new()))
        .unwrap();
    drop(updates);

    for _ in 0..200 {
        if !controller.is_running() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!controller.is_running());
    controller.stop_sensing().await.unwrap();
}

/// Answers the first call at once and stalls on every later one.
struct StallingRecognizer {
    calls: AtomicUsize,
    stall: Duration,
}

impl TextRecognizer for StallingRecognizer {
    fn recognize(&self, _frame: &Frame) -> Result<Vec<TextMatch>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
            std::thread::sleep(self.stall);
        }
        Ok(vec![TextMatch::new("Save", BoundingBox::new(2, 2, 12, 8))])
    }
}

#[tokio::test]
async fn test_ocr_timeout_still_delivers_changed_tiles() {
    let image = common::textured_image(120, 80);
    let source = ScriptedSource {
        frames: vec![
            Frame::from_image(image.clone()).unwrap(),
            common::with_patch(&image, TileRect::new(0, 0, 20, 20), [255, 255, 255, 255]),
        ],
        next: AtomicUsize::new(0),
    };
    let metrics = MetricsCollector::new();
    let mut ctx = SensingContext::new(Arc::new(source), TileConfig::default())
        .unwrap()
        .with_recognizer(Arc::new(StallingRecognizer {
            calls: AtomicUsize::new(0),
            stall: Duration::from_millis(400),
        }))
        .with_metrics(metrics.clone());
    ctx.interval = Duration::from_millis(10);
    ctx.timeout = Duration::from_millis(150);
    ctx.ocr_cooldown = Duration::ZERO;

    let mut controller = SensingController::new();
    let mut updates = controller.start_sensing(ctx).unwrap();

    let first = updates.recv().await.unwrap();
    assert!(first.diff.initial);
    assert!(first.text.is_some());

    let second = updates.recv().await.unwrap();
    assert_eq!(second.diff.changed, vec![1]);
    assert!(second.text.is_none());

    controller.stop_sensing().await.unwrap();

    let snapshot = metrics.snapshot().await;
    let reasons: Vec<Option<String>> = snapshot
        .recent_captures
        .iter()
        .map(|c| c.ocr_skipped_reason.clone())
        .collect();
    assert_eq!(reasons[1].as_deref(), Some("ocr timeout"));
    for capture in &snapshot.recent_captures {
        assert!(capture.capture_ms + capture.fingerprint_ms + capture.diff_ms <= capture.total_ms);
    }
}
