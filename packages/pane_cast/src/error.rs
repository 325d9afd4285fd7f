use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Why a capture cycle produced no usable frame.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// tmux could not be started at all.
    #[error("failed to run tmux: {0}")]
    Spawn(#[from] std::io::Error),

    /// tmux ran but refused the capture, usually because the session is gone.
    #[error("tmux capture failed ({status}): {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    /// The capture exceeded its deadline.
    #[error("tmux capture timed out after {0:?}")]
    Timeout(Duration),

    /// The pane exists but holds only whitespace; nothing has drawn yet.
    #[error("pane is empty, application not started")]
    EmptyPane,
}
