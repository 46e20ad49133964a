//! Drawing surface contract.
//!
//! The simulator never touches a platform drawing API. Each tick it clears a
//! `Surface`, draws the background field, then the particles. The browser
//! bridge implements this on a 2D canvas context; `FrameBuffer` records the
//! frame for tests and for hosts that render the instances themselves.

use crate::api::types::{Color, Viewport};
use crate::text::mask::FontSpec;

/// The three colors of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub foreground: Color,
    pub background: Color,
    pub accent: Color,
}

impl Palette {
    pub fn resolve(&self, ink: Ink) -> Color {
        match ink {
            Ink::Foreground => self.foreground,
            Ink::Accent => self.accent,
        }
    }
}

/// Which palette entry a glyph is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Foreground,
    Accent,
}

/// Fill or outline pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphStyle {
    Fill,
    Stroke,
}

/// Draw order group. Background glyphs always precede particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Particles,
}

/// Per-frame state handed to `Surface::begin_frame`.
#[derive(Debug, Clone)]
pub struct FrameInfo {
    pub viewport: Viewport,
    pub palette: Palette,
    /// Family and weight for particle glyphs; `size_px` is the configured glyph size.
    pub font: FontSpec,
}

/// One glyph, centered on `(x, y)` in canvas CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphDraw {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub glyph: char,
    pub ink: Ink,
    pub alpha: f32,
    pub style: GlyphStyle,
    pub layer: Layer,
}

/// A raster target the field draws into once per tick.
pub trait Surface {
    /// Resize if needed and clear to the palette's background color.
    fn begin_frame(&mut self, frame: &FrameInfo);

    fn draw_glyph(&mut self, glyph: &GlyphDraw);

    /// Called after the last glyph of the frame.
    fn end_frame(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_resolves_inks() {
        let palette = Palette {
            foreground: Color::rgb(1, 1, 1),
            background: Color::rgb(2, 2, 2),
            accent: Color::rgb(3, 3, 3),
        };
        assert_eq!(palette.resolve(Ink::Foreground), Color::rgb(1, 1, 1));
        assert_eq!(palette.resolve(Ink::Accent), Color::rgb(3, 3, 3));
    }

    #[test]
    fn background_layer_sorts_first() {
        assert!(Layer::Background < Layer::Particles);
    }
}
