//! Geometry self-healing.
//!
//! A full-screen application in a detached tmux session can keep a stale
//! idea of its terminal size. Re-asserting the pane size and sending the
//! pane's process a SIGWINCH makes it re-query and repaint at the geometry
//! the capture grid expects.

use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::metrics::ServerMetrics;

/// Run until cancelled, correcting the pane geometry on every tick. All
/// failures are logged and swallowed; a session that is down simply gets
/// corrected once it is back.
pub async fn run_monitor(
    session: String,
    cols: u16,
    rows: u16,
    interval: Duration,
    metrics: Arc<ServerMetrics>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Geometry monitor stopped");
                return;
            }
            _ = ticker.tick() => {}
        }

        match correct_geometry(&session, cols, rows).await {
            Ok(()) => metrics.geometry_corrected(),
            Err(err) => debug!("Geometry correction skipped: {err}"),
        }
    }
}

async fn correct_geometry(session: &str, cols: u16, rows: u16) -> anyhow::Result<()> {
    let output = Command::new("tmux")
        .args([
            "resize-window",
            "-t",
            session,
            "-x",
            &cols.to_string(),
            "-y",
            &rows.to_string(),
        ])
        .output()
        .await?;
    if !output.status.success() {
        anyhow::bail!("tmux resize-window exited with {}", output.status);
    }

    let output = Command::new("tmux")
        .args(["list-panes", "-t", session, "-F", "#{pane_pid}"])
        .output()
        .await?;
    if !output.status.success() {
        anyhow::bail!("tmux list-panes exited with {}", output.status);
    }

    for pid in parse_pane_pids(&String::from_utf8_lossy(&output.stdout)) {
        signal_resize(pid);
    }
    Ok(())
}

/// One pid per line, as printed by `list-panes -F '#{pane_pid}'`.
fn parse_pane_pids(output: &str) -> Vec<i32> {
    output
        .lines()
        .filter_map(|line| line.trim().parse().ok())
        .collect()
}

#[cfg(unix)]
fn signal_resize(pid: i32) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    if let Err(err) = kill(Pid::from_raw(pid), Signal::SIGWINCH) {
        debug!("SIGWINCH to {pid} failed: {err}");
    }
}

#[cfg(not(unix))]
fn signal_resize(_pid: i32) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_pid_per_line() {
        assert_eq!(parse_pane_pids("1234\n5678\n"), vec![1234, 5678]);
    }

    #[test]
    fn skips_blank_and_malformed_lines() {
        assert_eq!(parse_pane_pids("1234\n\nnot-a-pid\n 42 \n"), vec![1234, 42]);
    }

    #[test]
    fn empty_output_yields_no_pids() {
        assert!(parse_pane_pids("").is_empty());
    }

    #[tokio::test]
    async fn cancellation_stops_the_loop() {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_monitor(
            "definitely-not-a-real-session".to_string(),
            10,
            5,
            Duration::from_secs(3600),
            Arc::new(ServerMetrics::new()),
            cancel.clone(),
        ));
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("monitor did not stop after cancellation")
            .unwrap();
    }
}
