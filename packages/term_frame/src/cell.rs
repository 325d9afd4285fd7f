/// Terminal color: either inherited from the terminal default or a concrete
/// 24-bit value. "Unset" is a real state, not a stand-in for some default
/// color, and two cells differing only in unset-vs-set compare unequal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Unset,
    Rgb(u8, u8, u8),
}

impl Color {
    /// Lowercase 6-hex-digit form, `None` when unset.
    pub fn as_hex(&self) -> Option<String> {
        match self {
            Color::Unset => None,
            Color::Rgb(r, g, b) => Some(format!("{r:02x}{g:02x}{b:02x}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Unset,
            bg: Color::Unset,
            bold: false,
        }
    }
}
