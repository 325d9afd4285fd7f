mod cell;
mod diff;
mod frame;
mod palette;
mod parser;

pub use cell::{Cell, Color};
pub use diff::{FrameDiff, apply_cells, diff_frames};
pub use frame::Frame;
pub use palette::color_256;
pub use parser::parse_frame;
