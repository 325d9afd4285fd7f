use crate::cell::Cell;
use crate::frame::Frame;

/// Outcome of comparing a viewer's last-sent frame against the current one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameDiff {
    /// Identical frames; nothing to send.
    Unchanged,
    /// Sparse update: (linear index, new cell) per changed position.
    Cells(Vec<(usize, Cell)>),
    /// Too much changed, or the shapes differ; resend the whole frame.
    Full,
}

/// Compare two frames cell by cell. Falls back to `Full` when more than half
/// the cells changed, where the sparse encoding would cost more than the
/// frame itself.
pub fn diff_frames(prev: &Frame, next: &Frame) -> FrameDiff {
    if prev.cols() != next.cols() || prev.rows() != next.rows() {
        return FrameDiff::Full;
    }
    let mut changes = Vec::new();
    for (i, (old, new)) in prev.cells().iter().zip(next.cells()).enumerate() {
        if old != new {
            changes.push((i, *new));
        }
    }
    if changes.is_empty() {
        FrameDiff::Unchanged
    } else if changes.len() > next.len() / 2 {
        FrameDiff::Full
    } else {
        FrameDiff::Cells(changes)
    }
}

/// Apply a sparse change list in place. Out-of-range indices are ignored
/// rather than panicking.
pub fn apply_cells(frame: &mut Frame, changes: &[(usize, Cell)]) {
    for &(idx, cell) in changes {
        if let Some(slot) = frame.cells_mut().get_mut(idx) {
            *slot = cell;
        }
    }
}
