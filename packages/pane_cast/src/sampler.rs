//! The producer task: capture, parse, publish, on a fixed cadence.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use term_frame::parse_frame;

use crate::capture::capture_pane;
use crate::config::CaptureConfig;
use crate::metrics::ServerMetrics;
use crate::store::FrameStore;

/// Run until cancelled. A failed cycle keeps the previous frame in the store
/// and retries on the next tick; nothing here is fatal.
pub async fn run_sampler(
    config: CaptureConfig,
    store: Arc<FrameStore>,
    metrics: Arc<ServerMetrics>,
    cancel: CancellationToken,
) {
    // Give the captured application time to draw its first screen.
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(config.startup_delay) => {}
    }

    info!(
        "Sampling session '{}' every {:?} into a {}x{} grid",
        config.session, config.interval, config.cols, config.rows
    );

    let mut interval = tokio::time::interval(config.interval);
    let mut failing = false;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Sampler stopped");
                return;
            }
            _ = interval.tick() => {}
        }

        match capture_pane(&config.session, config.timeout).await {
            Ok(raw) => {
                let frame = parse_frame(&raw, config.cols as usize, config.rows as usize);
                store.publish(frame).await;
                metrics.capture_ok();
                if failing {
                    info!("Capture recovered");
                    failing = false;
                }
            }
            Err(err) => {
                metrics.capture_failed();
                // First failure at warn, repeats at debug
                if failing {
                    debug!("Capture still failing: {err}");
                } else {
                    warn!("Capture failed, keeping previous frame: {err}");
                    failing = true;
                }
            }
        }
    }
}
