//! Per-viewer streaming over SSE.
//!
//! Each `/stream` connection gets its own task holding its own copy of the
//! last frame it sent. Viewers that connect late or read slowly therefore
//! never affect each other; a slow viewer just sees coarser deltas.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::channel::mpsc;
use futures::{SinkExt, Stream};
use tracing::debug;

use term_frame::{Frame, FrameDiff, diff_frames};

use crate::AppState;
use crate::metrics::ServerMetrics;
use crate::protocol::Update;

/// Decide what (if anything) to send a viewer this cycle and roll the
/// viewer's snapshot forward when something is sent.
///
/// The first call always produces a full frame. After that: nothing when the
/// frame is unchanged, a full repaint when more than half the cells differ
/// (or the grid was resized), and a sparse delta otherwise.
pub fn next_update(last_sent: &mut Option<Arc<Frame>>, current: &Arc<Frame>) -> Option<Update> {
    let update = match last_sent {
        None => Some(Update::full(current)),
        Some(prev) => match diff_frames(prev, current) {
            FrameDiff::Unchanged => None,
            FrameDiff::Full => Some(Update::full(current)),
            FrameDiff::Cells(changes) => Some(Update::delta(&changes)),
        },
    };
    if update.is_some() {
        *last_sent = Some(current.clone());
    }
    update
}

/// GET /stream: long-lived SSE connection pushing full and delta updates.
pub async fn stream_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);
    tokio::spawn(run_viewer_loop(state, tx));
    Sse::new(rx).keep_alive(KeepAlive::default())
}

/// Decrements the active-viewer gauge however the connection ends.
struct ViewerGuard {
    metrics: Arc<ServerMetrics>,
}

impl Drop for ViewerGuard {
    fn drop(&mut self) {
        self.metrics.viewer_disconnected();
    }
}

async fn run_viewer_loop(state: AppState, mut tx: mpsc::Sender<Result<Event, Infallible>>) {
    state.metrics.viewer_connected();
    let _guard = ViewerGuard {
        metrics: state.metrics.clone(),
    };

    let mut interval = tokio::time::interval(state.config.stream_tick);
    let mut last_sent: Option<Arc<Frame>> = None;

    loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => {
                debug!("Stream closing: server shutting down");
                break;
            }
            _ = interval.tick() => {}
        }

        // Quiet cycles never reach send(), so a dropped receiver has to be
        // noticed here too.
        if tx.is_closed() {
            debug!("Stream closing: viewer disconnected");
            break;
        }

        // No frame yet: keep the connection open and check again next tick.
        let Some(current) = state.store.latest().await else {
            continue;
        };
        let Some(update) = next_update(&mut last_sent, &current) else {
            continue;
        };

        match &update {
            Update::Full { .. } => state.metrics.full_frame_sent(),
            Update::Delta { .. } => state.metrics.delta_frame_sent(),
        }

        let event = match Event::default().json_data(&update) {
            Ok(event) => event,
            Err(err) => {
                debug!("Failed to encode update: {err}");
                continue;
            }
        };

        // send() waits while the client catches up; ticks missed here show
        // up as one bigger diff on the next cycle.
        if tx.send(Ok(event)).await.is_err() {
            debug!("Stream closing: viewer disconnected");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, FileConfig};
    use futures::StreamExt;
    use std::time::Duration;
    use term_frame::parse_frame;

    fn frame(raw: &str, cols: usize, rows: usize) -> Arc<Frame> {
        Arc::new(parse_frame(raw, cols, rows))
    }

    #[test]
    fn first_message_is_always_full() {
        let current = frame("hello", 5, 1);
        let mut last_sent = None;

        let update = next_update(&mut last_sent, &current);
        assert!(matches!(update, Some(Update::Full { .. })));
        assert!(last_sent.is_some());
    }

    #[test]
    fn unchanged_frame_sends_nothing() {
        let current = frame("hello", 5, 1);
        let mut last_sent = Some(current.clone());

        assert!(next_update(&mut last_sent, &current).is_none());
    }

    #[test]
    fn small_change_sends_a_delta() {
        let before = frame("hello world, this is a line", 30, 1);
        let after = frame("hello worle, this is a line", 30, 1);
        let mut last_sent = Some(before);

        let update = next_update(&mut last_sent, &after);
        match update {
            Some(Update::Delta { d }) => assert_eq!(d.len(), 1),
            other => panic!("expected a delta, got {other:?}"),
        }
        // The snapshot rolled forward with the send
        assert!(Arc::ptr_eq(last_sent.as_ref().unwrap(), &after));
    }

    #[test]
    fn large_change_sends_a_full_frame() {
        let before = frame("aaaaaaaaaa", 10, 1);
        let after = frame("bbbbbbbbbb", 10, 1);
        let mut last_sent = Some(before);

        assert!(matches!(
            next_update(&mut last_sent, &after),
            Some(Update::Full { .. })
        ));
    }

    #[test]
    fn resize_forces_a_full_frame() {
        let before = frame("hello", 5, 1);
        let after = frame("hello", 10, 2);
        let mut last_sent = Some(before);

        assert!(matches!(
            next_update(&mut last_sent, &after),
            Some(Update::Full { .. })
        ));
    }

    #[test]
    fn viewers_at_different_speeds_stay_independent() {
        let first = frame("aaaa aaaa aaaa aaaa", 20, 1);
        let second = frame("aaaa aaab aaaa aaaa", 20, 1);
        let third = frame("aaaa aaab aaaa aaba", 20, 1);

        // Fast viewer sees every frame
        let mut fast = None;
        assert!(matches!(next_update(&mut fast, &first), Some(Update::Full { .. })));
        assert!(matches!(next_update(&mut fast, &second), Some(Update::Delta { .. })));
        assert!(matches!(next_update(&mut fast, &third), Some(Update::Delta { .. })));

        // Slow viewer missed the middle frame; its one delta covers both edits
        let mut slow = None;
        assert!(matches!(next_update(&mut slow, &first), Some(Update::Full { .. })));
        match next_update(&mut slow, &third) {
            Some(Update::Delta { d }) => assert_eq!(d.len(), 2),
            other => panic!("expected a delta, got {other:?}"),
        }

        // Both end anchored to the latest frame
        assert!(Arc::ptr_eq(fast.as_ref().unwrap(), &third));
        assert!(Arc::ptr_eq(slow.as_ref().unwrap(), &third));
    }

    #[test]
    fn skipped_cycles_do_not_lose_the_snapshot() {
        let first = frame("hello", 5, 1);
        let mut last_sent = None;

        next_update(&mut last_sent, &first);
        // Several unchanged cycles in a row
        assert!(next_update(&mut last_sent, &first).is_none());
        assert!(next_update(&mut last_sent, &first).is_none());
        assert!(Arc::ptr_eq(last_sent.as_ref().unwrap(), &first));
    }

    #[tokio::test]
    async fn dropped_receiver_ends_the_loop_and_clears_the_gauge() {
        let mut file_config = FileConfig::default();
        file_config.server.stream_tick_ms = 10;
        let state = AppState::new(AppConfig::from_file(&file_config));
        // One frame, never updated again: every cycle after the first full
        // frame is a quiet one.
        state.store.publish(parse_frame("hello", 5, 1)).await;

        let (tx, mut rx) = mpsc::channel(8);
        let handle = tokio::spawn(run_viewer_loop(state.clone(), tx));

        assert!(rx.next().await.is_some());
        assert_eq!(state.metrics.snapshot().viewers.active, 1);

        drop(rx);

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("viewer loop kept running after its receiver was dropped")
            .unwrap();

        let snapshot = state.metrics.snapshot();
        assert_eq!(snapshot.viewers.active, 0);
        assert_eq!(snapshot.viewers.total, 1);
    }
}
