//! Raw capture text -> fixed-size cell grid.
//!
//! A deliberately minimal take on terminal emulation: only SGR (`ESC[...m`)
//! sequences are interpreted, because a pane capture is already laid out in
//! final position. Cursor movement, scrollback and alternate screens never
//! appear in that output and are not handled.

use crate::cell::{Cell, Color};
use crate::frame::Frame;
use crate::palette;

const ESC: char = '\u{1b}';

/// Running attribute state, scoped to a single parse.
#[derive(Clone, Copy, Default)]
struct Attrs {
    fg: Color,
    bg: Color,
    bold: bool,
}

/// Parse one raw capture into a frame of exactly `cols * rows` cells.
///
/// Never fails: candidate escapes that do not complete the SGR pattern are
/// consumed as literal characters, short input is padded with blank cells,
/// overlong rows are truncated at the column boundary and extra lines are
/// dropped.
pub fn parse_frame(raw: &str, cols: usize, rows: usize) -> Frame {
    let mut cells = Vec::with_capacity(cols * rows);
    let mut attrs = Attrs::default();

    for line in raw.lines().take(rows) {
        parse_row(line, cols, &mut attrs, &mut cells);
    }
    cells.resize(cols * rows, Cell::default());
    Frame::from_cells(cols, rows, cells)
}

/// Scan one line left to right, appending exactly `cols` cells.
fn parse_row(line: &str, cols: usize, attrs: &mut Attrs, cells: &mut Vec<Cell>) {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    let mut produced = 0;

    while produced < cols && i < chars.len() {
        if chars[i] == ESC {
            if let Some((codes, next)) = scan_sgr(&chars, i) {
                apply_sgr(&codes, attrs);
                i = next;
                continue;
            }
        }
        cells.push(Cell {
            ch: chars[i],
            fg: attrs.fg,
            bg: attrs.bg,
            bold: attrs.bold,
        });
        produced += 1;
        i += 1;
    }
    for _ in produced..cols {
        cells.push(Cell::default());
    }
}

/// Try to lex an SGR sequence (`ESC [ digits/semicolons m`) starting at
/// `start`. Returns the parameter codes and the index just past the `m`,
/// or `None` if the full pattern is not present.
fn scan_sgr(chars: &[char], start: usize) -> Option<(Vec<u16>, usize)> {
    let mut i = start + 1;
    if chars.get(i) != Some(&'[') {
        return None;
    }
    i += 1;
    let body_start = i;
    while let Some(&c) = chars.get(i) {
        match c {
            '0'..='9' | ';' => i += 1,
            'm' => {
                let body: String = chars[body_start..i].iter().collect();
                return Some((parse_codes(&body), i + 1));
            }
            _ => return None,
        }
    }
    None
}

/// Split `;`-separated parameters. An empty segment is 0 per the ANSI
/// default; a value too large for u16 becomes u16::MAX and falls out as an
/// unknown code.
fn parse_codes(body: &str) -> Vec<u16> {
    body.split(';')
        .map(|seg| {
            if seg.is_empty() {
                0
            } else {
                seg.parse().unwrap_or(u16::MAX)
            }
        })
        .collect()
}

/// Apply SGR codes left to right. 38/48 consume their own parameters;
/// unknown or under-supplied codes are skipped.
fn apply_sgr(codes: &[u16], attrs: &mut Attrs) {
    let mut i = 0;
    while i < codes.len() {
        match codes[i] {
            0 => *attrs = Attrs::default(),
            1 => attrs.bold = true,
            22 => attrs.bold = false,
            30..=37 => attrs.fg = palette::base_color((codes[i] - 30) as u8),
            90..=97 => attrs.fg = palette::base_color((codes[i] - 90 + 8) as u8),
            40..=47 => attrs.bg = palette::base_color((codes[i] - 40) as u8),
            100..=107 => attrs.bg = palette::base_color((codes[i] - 100 + 8) as u8),
            39 => attrs.fg = Color::Unset,
            49 => attrs.bg = Color::Unset,
            38 | 48 => {
                if let Some((color, consumed)) = extended_color(&codes[i + 1..]) {
                    if codes[i] == 38 {
                        attrs.fg = color;
                    } else {
                        attrs.bg = color;
                    }
                    i += consumed;
                }
            }
            _ => {}
        }
        i += 1;
    }
}

/// Decode the parameter tail of a 38/48 directive (`5;N` or `2;R;G;B`).
/// Returns the color and how many parameter codes were consumed.
fn extended_color(params: &[u16]) -> Option<(Color, usize)> {
    match params.first()? {
        5 => {
            let idx = *params.get(1)?;
            if idx > 255 {
                return None;
            }
            Some((palette::color_256(idx as u8), 2))
        }
        2 => {
            let r = *params.get(1)?;
            let g = *params.get(2)?;
            let b = *params.get(3)?;
            if r > 255 || g > 255 || b > 255 {
                return None;
            }
            Some((Color::Rgb(r as u8, g as u8, b as u8), 4))
        }
        _ => None,
    }
}
