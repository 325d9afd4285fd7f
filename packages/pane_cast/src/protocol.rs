//! Wire format shared by `/stream` and `/frame`.
//!
//! Cells travel as compact JSON arrays rather than objects; with a 200x50
//! grid a full frame is 10,000 cells and the field names would dominate the
//! payload.

use serde::Serialize;
use term_frame::{Cell, Frame};

/// One cell on the wire: `[char, fg, bg, weight]`. Colors are lowercase hex
/// strings or `null` for the terminal default; weight is 0 or 1.
#[derive(Debug, Clone, Serialize)]
pub struct WireCell(char, Option<String>, Option<String>, u8);

impl From<&Cell> for WireCell {
    fn from(cell: &Cell) -> Self {
        Self(cell.ch, cell.fg.as_hex(), cell.bg.as_hex(), cell.bold as u8)
    }
}

/// One changed cell on the wire: `[index, char, fg, bg, weight]`, the index
/// being row-major into the grid.
#[derive(Debug, Clone, Serialize)]
pub struct WireChange(usize, char, Option<String>, Option<String>, u8);

/// A message pushed to viewers: a full repaint or a sparse delta.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "t")]
pub enum Update {
    #[serde(rename = "f")]
    Full { c: Vec<WireCell> },
    #[serde(rename = "d")]
    Delta { d: Vec<WireChange> },
}

impl Update {
    pub fn full(frame: &Frame) -> Self {
        Update::Full {
            c: frame.cells().iter().map(WireCell::from).collect(),
        }
    }

    pub fn delta(changes: &[(usize, Cell)]) -> Self {
        Update::Delta {
            d: changes
                .iter()
                .map(|(index, cell)| {
                    WireChange(
                        *index,
                        cell.ch,
                        cell.fg.as_hex(),
                        cell.bg.as_hex(),
                        cell.bold as u8,
                    )
                })
                .collect(),
        }
    }
}
