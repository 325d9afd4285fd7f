//! Runtime counters surfaced through `/health`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Process-wide counters, bumped with relaxed atomics from every task.
#[derive(Debug)]
pub struct ServerMetrics {
    /// Successful capture-and-parse cycles
    captures_ok: AtomicU64,
    /// Capture attempts that failed (timeout, missing session, empty pane)
    captures_failed: AtomicU64,
    /// Stream connections currently open
    viewers_active: AtomicU64,
    /// Stream connections accepted since startup
    viewers_total: AtomicU64,
    /// Full-frame messages sent, summed over all viewers
    full_frames_sent: AtomicU64,
    /// Delta messages sent, summed over all viewers
    delta_frames_sent: AtomicU64,
    /// Successful geometry corrections
    geometry_corrections: AtomicU64,
    start_time: Instant,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self {
            captures_ok: AtomicU64::new(0),
            captures_failed: AtomicU64::new(0),
            viewers_active: AtomicU64::new(0),
            viewers_total: AtomicU64::new(0),
            full_frames_sent: AtomicU64::new(0),
            delta_frames_sent: AtomicU64::new(0),
            geometry_corrections: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn capture_ok(&self) {
        self.captures_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub fn capture_failed(&self) {
        self.captures_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn viewer_connected(&self) {
        self.viewers_active.fetch_add(1, Ordering::Relaxed);
        self.viewers_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn viewer_disconnected(&self) {
        self.viewers_active.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn full_frame_sent(&self) {
        self.full_frames_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn delta_frame_sent(&self) {
        self.delta_frames_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn geometry_corrected(&self) {
        self.geometry_corrections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Consistent-enough point-in-time copy for serialization.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.uptime_secs(),
            captures: CaptureCounters {
                ok: self.captures_ok.load(Ordering::Relaxed),
                failed: self.captures_failed.load(Ordering::Relaxed),
            },
            viewers: ViewerCounters {
                active: self.viewers_active.load(Ordering::Relaxed),
                total: self.viewers_total.load(Ordering::Relaxed),
            },
            messages: MessageCounters {
                full: self.full_frames_sent.load(Ordering::Relaxed),
                delta: self.delta_frames_sent.load(Ordering::Relaxed),
            },
            geometry_corrections: self.geometry_corrections.load(Ordering::Relaxed),
        }
    }
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub captures: CaptureCounters,
    pub viewers: ViewerCounters,
    pub messages: MessageCounters,
    pub geometry_corrections: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureCounters {
    pub ok: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerCounters {
    pub active: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCounters {
    pub full: u64,
    pub delta: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let metrics = ServerMetrics::new();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.captures.ok, 0);
        assert_eq!(snapshot.captures.failed, 0);
        assert_eq!(snapshot.viewers.active, 0);
        assert_eq!(snapshot.messages.full, 0);
        assert_eq!(snapshot.geometry_corrections, 0);
    }

    #[test]
    fn viewer_lifecycle_tracks_active_and_total() {
        let metrics = ServerMetrics::new();
        metrics.viewer_connected();
        metrics.viewer_connected();
        metrics.viewer_disconnected();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.viewers.active, 1);
        assert_eq!(snapshot.viewers.total, 2);
    }

    #[test]
    fn capture_and_message_counters_accumulate() {
        let metrics = ServerMetrics::new();
        metrics.capture_ok();
        metrics.capture_ok();
        metrics.capture_failed();
        metrics.full_frame_sent();
        metrics.delta_frame_sent();
        metrics.delta_frame_sent();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.captures.ok, 2);
        assert_eq!(snapshot.captures.failed, 1);
        assert_eq!(snapshot.messages.full, 1);
        assert_eq!(snapshot.messages.delta, 2);
    }

    #[test]
    fn snapshot_serializes_nested() {
        let metrics = ServerMetrics::new();
        metrics.capture_ok();
        let json = serde_json::to_value(metrics.snapshot()).unwrap();
        assert_eq!(json["captures"]["ok"], 1);
        assert_eq!(json["viewers"]["active"], 0);
        assert!(json["uptime_secs"].is_u64());
    }
}
