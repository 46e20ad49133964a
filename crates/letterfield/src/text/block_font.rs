//! Built-in 5×7 bitmap font.
//!
//! Lets the field lay out and sample words without a platform text stack.
//! Lowercase maps to uppercase; characters outside the table render blank but
//! still advance, so spacing is preserved.

use super::mask::{FontSpec, GlyphMask, PlacedGlyph, TextRasterizer, VerticalMetrics};

const ROWS: usize = 7;
const COLS: usize = 5;
/// Glyph cell plus one column of spacing.
const ADVANCE_CELLS: f32 = 6.0;

/// Rows top to bottom; bit 4 is the leftmost column.
fn bitmap(ch: char) -> Option<[u8; ROWS]> {
    let rows = match ch.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        '\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '/' => [0b00001, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000],
        '&' => [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101],
        _ => return None,
    };
    Some(rows)
}

/// 5×7 bitmap rasterizer. Ignores family and weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFont;

impl BlockFont {
    pub fn new() -> Self {
        Self
    }

    /// Whether `ch` has a bitmap (blank advance otherwise).
    pub fn supports(ch: char) -> bool {
        bitmap(ch).is_some()
    }

    fn unit(font: &FontSpec) -> f32 {
        font.size_px.max(0.0) / ROWS as f32
    }
}

impl TextRasterizer for BlockFont {
    fn advance(&mut self, _ch: char, font: &FontSpec) -> f32 {
        ADVANCE_CELLS * Self::unit(font)
    }

    fn metrics(&mut self, font: &FontSpec) -> VerticalMetrics {
        VerticalMetrics {
            ascent: ROWS as f32 * Self::unit(font),
            descent: 0.0,
        }
    }

    fn rasterize(&mut self, glyphs: &[PlacedGlyph], font: &FontSpec, width: u32, height: u32) -> GlyphMask {
        let mut mask = GlyphMask::new(width, height);
        let unit = Self::unit(font);
        if unit <= 0.0 {
            return mask;
        }
        for glyph in glyphs {
            let Some(rows) = bitmap(glyph.ch) else {
                continue;
            };
            let top = glyph.baseline - ROWS as f32 * unit;
            for (r, bits) in rows.iter().enumerate() {
                for c in 0..COLS {
                    if bits & (1 << (COLS - 1 - c)) == 0 {
                        continue;
                    }
                    let x0 = (glyph.x + c as f32 * unit).floor() as i64;
                    let y0 = (top + r as f32 * unit).floor() as i64;
                    let x1 = ((glyph.x + (c + 1) as f32 * unit).floor() as i64).max(x0 + 1);
                    let y1 = ((top + (r + 1) as f32 * unit).floor() as i64).max(y0 + 1);
                    mask.fill_rect(x0, y0, x1, y1);
                }
            }
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(size: f32) -> FontSpec {
        FontSpec::new("block", 400, size)
    }

    #[test]
    fn lowercase_maps_to_uppercase() {
        assert_eq!(bitmap('a'), bitmap('A'));
        assert!(BlockFont::supports('z'));
        assert!(!BlockFont::supports('~'));
    }

    #[test]
    fn unit_scale_renders_exact_bitmap() {
        let mut rast = BlockFont::new();
        let glyphs = [PlacedGlyph { ch: 'T', x: 0.0, baseline: 7.0 }];
        let mask = rast.rasterize(&glyphs, &font(7.0), 5, 7);
        // T: full top bar plus a 6-pixel stem.
        assert_eq!(mask.coverage(), 5 + 6);
        assert!(mask.is_set(2, 6));
        assert!(!mask.is_set(0, 6));
    }

    #[test]
    fn unknown_chars_render_blank() {
        let mut rast = BlockFont::new();
        let glyphs = [PlacedGlyph { ch: '~', x: 0.0, baseline: 14.0 }];
        let mask = rast.rasterize(&glyphs, &font(14.0), 20, 20);
        assert_eq!(mask.coverage(), 0);
    }

    #[test]
    fn coverage_scales_with_size() {
        let mut rast = BlockFont::new();
        let glyphs = [PlacedGlyph { ch: 'O', x: 0.0, baseline: 70.0 }];
        let small = rast.rasterize(&glyphs, &font(7.0), 100, 100).coverage();
        let big = rast.rasterize(&glyphs, &font(70.0), 100, 100).coverage();
        assert_eq!(big, small * 100);
    }

    #[test]
    fn metrics_track_size() {
        let mut rast = BlockFont::new();
        assert_eq!(rast.metrics(&font(70.0)).ascent, 70.0);
        assert_eq!(rast.advance('A', &font(70.0)), 60.0);
    }
}
