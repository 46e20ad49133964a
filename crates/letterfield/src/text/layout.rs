//! Word layout and target-point sampling.
//!
//! The word is laid out in device pixels so it spans at most `word_scale` of
//! the canvas in either direction, rendered to a mask, and sampled on a grid.

use glam::Vec2;

use super::mask::{FontSpec, GlyphMask, PlacedGlyph, TextRasterizer};
use crate::api::config::FieldConfig;
use crate::api::types::Viewport;
use crate::systems::rng::Rng;

/// Font size used to measure a word before scaling it to the canvas.
pub const REFERENCE_FONT_PX: f32 = 100.0;
/// Total per-axis spread of the jitter applied to samples, as a fraction of the gap.
pub const TARGET_JITTER: f32 = 0.6;

/// A word positioned on the device-pixel mask.
#[derive(Debug, Clone, PartialEq)]
pub struct WordLayout {
    pub font: FontSpec,
    pub glyphs: Vec<PlacedGlyph>,
    /// Total advance width in device pixels.
    pub width: f32,
}

/// Jitter spread for a sampling gap, in CSS pixels.
pub fn jitter_spread(gap: f32) -> f32 {
    gap * TARGET_JITTER
}

/// Center `word` on the device-pixel canvas. `None` for blank words.
pub fn layout_word<R: TextRasterizer>(
    word: &str,
    config: &FieldConfig,
    viewport: &Viewport,
    rasterizer: &mut R,
) -> Option<WordLayout> {
    if word.trim().is_empty() {
        return None;
    }
    let reference = FontSpec::new(config.font_family.clone(), config.font_weight, REFERENCE_FONT_PX);
    let ref_width = line_width(word, &reference, config.letter_spacing, rasterizer);
    let ref_height = rasterizer.metrics(&reference).height();
    if ref_width <= 0.0 || ref_height <= 0.0 {
        return None;
    }

    let device_w = viewport.device_width() as f32;
    let device_h = viewport.device_height() as f32;
    let scale = (config.word_scale * device_w / ref_width).min(config.word_scale * device_h / ref_height);
    let font = reference.with_size(REFERENCE_FONT_PX * scale);

    let spacing = config.letter_spacing * font.size_px;
    let width = line_width(word, &font, config.letter_spacing, rasterizer);
    let metrics = rasterizer.metrics(&font);
    let baseline = (device_h + metrics.ascent - metrics.descent) / 2.0;

    let mut cursor = (device_w - width) / 2.0;
    let mut glyphs = Vec::with_capacity(word.len());
    for ch in word.chars() {
        glyphs.push(PlacedGlyph { ch, x: cursor, baseline });
        // Always advance, even for blanks, to preserve spacing.
        cursor += rasterizer.advance(ch, &font) + spacing;
    }

    Some(WordLayout { font, glyphs, width })
}

fn line_width<R: TextRasterizer>(word: &str, font: &FontSpec, letter_spacing: f32, rasterizer: &mut R) -> f32 {
    let mut width = 0.0;
    let mut count = 0usize;
    for ch in word.chars() {
        width += rasterizer.advance(ch, font);
        count += 1;
    }
    width + letter_spacing * font.size_px * count.saturating_sub(1) as f32
}

/// Sample opaque mask pixels on a `gap × dpr` grid, jittered, in CSS pixels.
///
/// The count depends only on the mask and the grid; jitter moves points but
/// never adds or drops one.
pub fn sample_targets(mask: &GlyphMask, viewport: &Viewport, gap: f32, rng: &mut Rng) -> Vec<Vec2> {
    let step = (gap * viewport.dpr).round().max(1.0) as usize;
    let spread = jitter_spread(gap);
    let mut points = Vec::new();
    for y in (0..mask.height()).step_by(step) {
        for x in (0..mask.width()).step_by(step) {
            if mask.is_set(x, y) {
                let css = Vec2::new(x as f32, y as f32) / viewport.dpr;
                points.push(css + Vec2::new(rng.centered(spread), rng.centered(spread)));
            }
        }
    }
    points
}

/// Lay out, rasterize and sample `word`. Empty for blank words.
pub fn compute_targets<R: TextRasterizer>(
    word: &str,
    config: &FieldConfig,
    viewport: &Viewport,
    rasterizer: &mut R,
    rng: &mut Rng,
) -> Vec<Vec2> {
    let Some(layout) = layout_word(word, config, viewport, rasterizer) else {
        return Vec::new();
    };
    let mask = rasterizer.rasterize(
        &layout.glyphs,
        &layout.font,
        viewport.device_width(),
        viewport.device_height(),
    );
    sample_targets(&mask, viewport, config.sample_gap, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::block_font::BlockFont;

    fn setup() -> (FieldConfig, Viewport) {
        (FieldConfig::default(), Viewport::new(800.0, 400.0, 1.0))
    }

    #[test]
    fn blank_word_has_no_layout_or_targets() {
        let (config, vp) = setup();
        let mut font = BlockFont::new();
        assert!(layout_word("   ", &config, &vp, &mut font).is_none());
        assert!(compute_targets("", &config, &vp, &mut font, &mut Rng::new(1)).is_empty());
    }

    #[test]
    fn word_fits_and_is_centered() {
        let (config, vp) = setup();
        let mut font = BlockFont::new();
        let layout = layout_word("HELLO", &config, &vp, &mut font).unwrap();
        assert!(layout.width <= config.word_scale * 800.0 + 1e-3);
        let left = layout.glyphs[0].x;
        assert!((left - (800.0 - layout.width) / 2.0).abs() < 1e-3);
        assert!(layout.font.size_px <= config.word_scale * 400.0 + 1e-3);
    }

    #[test]
    fn target_count_is_stable_across_runs() {
        let (config, vp) = setup();
        let mut font = BlockFont::new();
        let a = compute_targets("STABLE", &config, &vp, &mut font, &mut Rng::new(1));
        let b = compute_targets("STABLE", &config, &vp, &mut font, &mut Rng::new(99));
        assert!(!a.is_empty());
        assert!((a.len() as i64 - b.len() as i64).abs() <= 1);
        assert_ne!(a, b, "jitter should move points");
    }

    #[test]
    fn targets_lie_inside_canvas_near_word() {
        let (config, vp) = setup();
        let mut font = BlockFont::new();
        let layout = layout_word("AB", &config, &vp, &mut font).unwrap();
        let targets = compute_targets("AB", &config, &vp, &mut font, &mut Rng::new(5));
        let slack = jitter_spread(config.sample_gap);
        let left = layout.glyphs[0].x - slack;
        let right = layout.glyphs[0].x + layout.width + slack;
        for t in &targets {
            assert!(t.x >= left && t.x <= right, "x {} outside [{}, {}]", t.x, left, right);
            assert!(t.y >= -slack && t.y <= 400.0 + slack);
        }
    }

    #[test]
    fn sampling_uses_device_pixels() {
        let mut mask = GlyphMask::new(40, 40);
        mask.fill_rect(0, 0, 40, 40);
        let vp = Viewport::new(20.0, 20.0, 2.0);
        let points = sample_targets(&mask, &vp, 5.0, &mut Rng::new(2));
        // step = 10 device px → 4 × 4 samples
        assert_eq!(points.len(), 16);
        for p in &points {
            assert!(p.x >= -1.5 && p.x <= 16.5);
        }
    }
}
