use crate::cell::Cell;

/// One captured screen: a cols x rows grid of cells in row-major order.
/// The cell vector is always exactly cols * rows long.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Frame {
    /// All-blank frame of the given dimensions.
    pub fn blank(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols * rows],
        }
    }

    pub(crate) fn from_cells(cols: usize, rows: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), cols * rows);
        Self { cols, rows, cells }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Linear index of (col, row).
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    pub fn cell(&self, col: usize, row: usize) -> &Cell {
        &self.cells[self.index(col, row)]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Color;

    #[test]
    fn blank_frame_shape() {
        let frame = Frame::blank(80, 24);
        assert_eq!(frame.cols(), 80);
        assert_eq!(frame.rows(), 24);
        assert_eq!(frame.len(), 80 * 24);
        assert!(frame.cells().iter().all(|c| *c == Cell::default()));
    }

    #[test]
    fn linear_indexing_is_row_major() {
        let frame = Frame::blank(10, 4);
        assert_eq!(frame.index(0, 0), 0);
        assert_eq!(frame.index(9, 0), 9);
        assert_eq!(frame.index(0, 1), 10);
        assert_eq!(frame.index(3, 2), 23);
    }

    #[test]
    fn zero_sized_frame_is_empty() {
        let frame = Frame::blank(0, 0);
        assert!(frame.is_empty());
        assert_eq!(frame.len(), 0);
    }

    #[test]
    fn equality_sees_cell_content() {
        let a = Frame::blank(2, 2);
        let mut b = Frame::blank(2, 2);
        assert_eq!(a, b);
        b.cells_mut()[3] = Cell {
            ch: 'z',
            fg: Color::Rgb(1, 2, 3),
            ..Cell::default()
        };
        assert_ne!(a, b);
    }
}
