use crate::cell::Color;

/// Base 16-entry palette: VGA colors 0-7, bright variants 8-15.
const BASE: [(u8, u8, u8); 16] = [
    (0x00, 0x00, 0x00), // black
    (0xaa, 0x00, 0x00), // red
    (0x00, 0xaa, 0x00), // green
    (0xaa, 0x55, 0x00), // yellow (brown)
    (0x00, 0x00, 0xaa), // blue
    (0xaa, 0x00, 0xaa), // magenta
    (0x00, 0xaa, 0xaa), // cyan
    (0xaa, 0xaa, 0xaa), // white
    (0x55, 0x55, 0x55), // bright black
    (0xff, 0x55, 0x55), // bright red
    (0x55, 0xff, 0x55), // bright green
    (0xff, 0xff, 0x55), // bright yellow
    (0x55, 0x55, 0xff), // bright blue
    (0xff, 0x55, 0xff), // bright magenta
    (0x55, 0xff, 0xff), // bright cyan
    (0xff, 0xff, 0xff), // bright white
];

/// Base-palette entry. Callers pass 0-15; higher bits are masked off.
pub(crate) fn base_color(idx: u8) -> Color {
    let (r, g, b) = BASE[(idx & 0x0f) as usize];
    Color::Rgb(r, g, b)
}

/// Resolve an xterm 256-color index: 0-15 base palette, 16-231 the 6x6x6
/// cube (each component is its base-6 digit scaled by 51), 232-255 the
/// grayscale ramp (8 + 10 per step).
pub fn color_256(idx: u8) -> Color {
    match idx {
        0..=15 => base_color(idx),
        16..=231 => {
            let n = idx - 16;
            let r = n / 36;
            let g = (n / 6) % 6;
            let b = n % 6;
            Color::Rgb(r * 51, g * 51, b * 51)
        }
        232..=255 => {
            let v = 8 + 10 * (idx - 232);
            Color::Rgb(v, v, v)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_entries() {
        assert_eq!(color_256(0), Color::Rgb(0x00, 0x00, 0x00));
        assert_eq!(color_256(1), Color::Rgb(0xaa, 0x00, 0x00));
        assert_eq!(color_256(7), Color::Rgb(0xaa, 0xaa, 0xaa));
        assert_eq!(color_256(8), Color::Rgb(0x55, 0x55, 0x55));
        assert_eq!(color_256(15), Color::Rgb(0xff, 0xff, 0xff));
    }

    #[test]
    fn cube_corners() {
        // 16 = cube origin, 231 = cube max
        assert_eq!(color_256(16), Color::Rgb(0, 0, 0));
        assert_eq!(color_256(231), Color::Rgb(255, 255, 255));
        // 196 = 16 + 5*36: pure red at full intensity
        assert_eq!(color_256(196), Color::Rgb(255, 0, 0));
        // 21 = 16 + 5: pure blue
        assert_eq!(color_256(21), Color::Rgb(0, 0, 255));
        // 46 = 16 + 5*6: pure green
        assert_eq!(color_256(46), Color::Rgb(0, 255, 0));
    }

    #[test]
    fn cube_component_scaling() {
        // 17 = 16 + 1: blue digit 1 -> 51
        assert_eq!(color_256(17), Color::Rgb(0, 0, 51));
        // 90 = 16 + 2*36 + 0*6 + 2
        assert_eq!(color_256(90), Color::Rgb(102, 0, 102));
    }

    #[test]
    fn grayscale_ramp() {
        assert_eq!(color_256(232), Color::Rgb(0x08, 0x08, 0x08));
        assert_eq!(color_256(233), Color::Rgb(18, 18, 18));
        assert_eq!(color_256(255), Color::Rgb(0xee, 0xee, 0xee));
    }

    #[test]
    fn grayscale_hex_anchors() {
        assert_eq!(color_256(232).as_hex().as_deref(), Some("080808"));
        assert_eq!(color_256(255).as_hex().as_deref(), Some("eeeeee"));
    }
}
