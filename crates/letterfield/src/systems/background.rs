//! Decorative "static": a sparse grid of faint, flickering glyphs behind the word.

use std::f32::consts::TAU;

use glam::Vec2;

use super::particle::random_glyph;
use super::rng::Rng;
use crate::api::types::Viewport;
use crate::renderer::traits::{GlyphDraw, GlyphStyle, Ink, Layer, Surface};

/// Peak opacity range of a background glyph.
const MIN_PEAK_ALPHA: f32 = 0.04;
const MAX_PEAK_ALPHA: f32 = 0.16;

#[derive(Debug, Clone, PartialEq)]
pub struct StaticGlyph {
    pub pos: Vec2,
    pub glyph: char,
    /// Flicker phase offset in radians.
    pub phase: f32,
    pub peak_alpha: f32,
}

impl StaticGlyph {
    /// Opacity at `time_ms` for a global flicker `speed` (radians per ms).
    pub fn alpha(&self, time_ms: f64, speed: f32) -> f32 {
        let wave = ((time_ms as f32) * speed + self.phase).sin();
        self.peak_alpha * (0.5 + 0.5 * wave)
    }
}

/// Background glyph grid, rebuilt whenever the canvas changes size.
#[derive(Debug, Clone, Default)]
pub struct StaticField {
    glyphs: Vec<StaticGlyph>,
}

impl StaticField {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fill a `cell`-sized grid over the viewport, keeping each cell with probability `density`.
    pub fn build(viewport: &Viewport, cell: f32, density: f32, rng: &mut Rng) -> Self {
        let cell = cell.max(1.0);
        let cols = (viewport.width / cell).ceil() as usize;
        let rows = (viewport.height / cell).ceil() as usize;
        let mut glyphs = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                if rng.next_f32() >= density {
                    continue;
                }
                let center = Vec2::new((col as f32 + 0.5) * cell, (row as f32 + 0.5) * cell);
                glyphs.push(StaticGlyph {
                    pos: center + Vec2::new(rng.centered(cell * 0.3), rng.centered(cell * 0.3)),
                    glyph: random_glyph(rng),
                    phase: rng.range(0.0, TAU),
                    peak_alpha: rng.range(MIN_PEAK_ALPHA, MAX_PEAK_ALPHA),
                });
            }
        }
        Self { glyphs }
    }

    pub fn glyphs(&self) -> &[StaticGlyph] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn draw<S: Surface>(&self, surface: &mut S, time_ms: f64, speed: f32, size: f32) {
        for g in &self.glyphs {
            surface.draw_glyph(&GlyphDraw {
                x: g.pos.x,
                y: g.pos.y,
                size,
                glyph: g.glyph,
                ink: Ink::Foreground,
                alpha: g.alpha(time_ms, speed),
                style: GlyphStyle::Fill,
                layer: Layer::Background,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::instance::FrameBuffer;

    #[test]
    fn density_bounds() {
        let vp = Viewport::new(280.0, 140.0, 1.0);
        let none = StaticField::build(&vp, 28.0, 0.0, &mut Rng::new(1));
        assert!(none.is_empty());
        let full = StaticField::build(&vp, 28.0, 1.0, &mut Rng::new(1));
        assert_eq!(full.len(), 10 * 5);
    }

    #[test]
    fn alpha_oscillates_within_peak() {
        let g = StaticGlyph {
            pos: Vec2::ZERO,
            glyph: 'X',
            phase: 0.0,
            peak_alpha: 0.1,
        };
        let mut lo = f32::MAX;
        let mut hi = f32::MIN;
        for t in 0..2000 {
            let a = g.alpha(t as f64 * 10.0, 0.0015);
            lo = lo.min(a);
            hi = hi.max(a);
        }
        assert!(lo >= 0.0 && lo < 0.01);
        assert!(hi <= 0.1 + 1e-6 && hi > 0.09);
    }

    #[test]
    fn draw_emits_background_layer() {
        let vp = Viewport::new(100.0, 100.0, 1.0);
        let field = StaticField::build(&vp, 20.0, 1.0, &mut Rng::new(4));
        let mut buf = FrameBuffer::new();
        field.draw(&mut buf, 0.0, 0.001, 9.0);
        assert_eq!(buf.layer(Layer::Background).count(), field.len());
        assert_eq!(buf.layer(Layer::Particles).count(), 0);
    }
}
