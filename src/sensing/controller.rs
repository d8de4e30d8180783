use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::loop_worker::{sensing_loop, CaptureUpdate, SensingContext};

const UPDATE_CHANNEL_CAPACITY: usize = 8;

/// Starts and stops the background capture loop.
pub struct SensingController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SensingController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Spawn the capture loop; updates arrive on the returned receiver.
    /// Must be called from within a tokio runtime.
    pub fn start_sensing(&mut self, ctx: SensingContext) -> Result<mpsc::Receiver<CaptureUpdate>> {
        if self.is_running() {
            bail!("sensing already active");
        }

        info!(
            "Starting sensing loop: grid {}, threshold {}, every {:?}",
            ctx.config.grid, ctx.config.threshold, ctx.interval
        );

        let cancel_token = CancellationToken::new();
        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);

        let handle = tokio::spawn(sensing_loop(ctx, tx, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(rx)
    }

    pub async fn stop_sensing(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("sensing loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for SensingController {
    fn default() -> Self {
        Self::new()
    }
}
