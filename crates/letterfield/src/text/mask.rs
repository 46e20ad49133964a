//! Monochrome glyph masks and the rasterizer contract that produces them.

/// Font selection for mask rendering and glyph drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16,
    pub size_px: f32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, weight: u16, size_px: f32) -> Self {
        Self {
            family: family.into(),
            weight,
            size_px,
        }
    }

    /// Same family and weight at another size.
    pub fn with_size(&self, size_px: f32) -> Self {
        Self {
            size_px,
            ..self.clone()
        }
    }

    /// CSS shorthand, e.g. `800 120px Inter, sans-serif`.
    pub fn css(&self) -> String {
        format!("{} {}px {}", self.weight, self.size_px, self.family)
    }
}

/// Vertical extent of a font above and below the baseline, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalMetrics {
    pub ascent: f32,
    pub descent: f32,
}

impl VerticalMetrics {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// A character placed on the mask: left edge and baseline, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    pub ch: char,
    pub x: f32,
    pub baseline: f32,
}

/// One-bit coverage mask at device-pixel resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl GlyphMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Build from RGBA pixels, treating alpha above half as opaque.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        let mut mask = Self::new(width, height);
        for (bit, px) in mask.bits.iter_mut().zip(rgba.chunks_exact(4)) {
            *bit = px[3] > 127;
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.bits[i] = true;
        }
    }

    /// Set every pixel in `[x0, x1) × [y0, y1)`, clipped to the mask.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64) {
        let x0 = x0.clamp(0, self.width as i64) as u32;
        let x1 = x1.clamp(0, self.width as i64) as u32;
        let y0 = y0.clamp(0, self.height as i64) as u32;
        let y1 = y1.clamp(0, self.height as i64) as u32;
        for y in y0..y1 {
            let row = (y * self.width) as usize;
            self.bits[row + x0 as usize..row + x1.max(x0) as usize].fill(true);
        }
    }

    /// Number of opaque pixels.
    pub fn coverage(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }
}

/// Renders text into coverage masks.
///
/// The browser bridge implements this on an offscreen canvas; `BlockFont` is
/// the built-in bitmap fallback.
pub trait TextRasterizer {
    /// Horizontal advance of `ch` at `font`, in pixels.
    fn advance(&mut self, ch: char, font: &FontSpec) -> f32;

    fn metrics(&mut self, font: &FontSpec) -> VerticalMetrics;

    /// Render `glyphs` into a fresh `width × height` mask.
    fn rasterize(&mut self, glyphs: &[PlacedGlyph], font: &FontSpec, width: u32, height: u32) -> GlyphMask;
}
