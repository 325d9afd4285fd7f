//! Pane capture via `tmux capture-pane`.

use std::time::Duration;

use tokio::process::Command;

use crate::error::CaptureError;

/// Capture the pane's visible contents with escape sequences preserved
/// (`-e`). The whole invocation is bounded by `timeout` so a wedged tmux
/// cannot stall the sampling loop.
pub async fn capture_pane(session: &str, timeout: Duration) -> Result<String, CaptureError> {
    let output = tokio::time::timeout(
        timeout,
        Command::new("tmux")
            .args(["capture-pane", "-t", session, "-p", "-e"])
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| CaptureError::Timeout(timeout))??;

    if !output.status.success() {
        return Err(CaptureError::Failed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    if text.trim().is_empty() {
        return Err(CaptureError::EmptyPane);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    // tmux itself is not available in unit tests; spawning a command that
    // cannot exist exercises the error path end to end.
    #[tokio::test]
    async fn missing_session_or_binary_is_an_error() {
        let result = capture_pane("no-such-session-for-sure", Duration::from_secs(2)).await;
        assert!(result.is_err());
    }
}
