//! Text layout, glyph masks and target sampling.

pub mod block_font;
pub mod layout;
pub mod mask;

pub use block_font::BlockFont;
pub use layout::{compute_targets, layout_word, sample_targets, WordLayout};
pub use mask::{FontSpec, GlyphMask, PlacedGlyph, TextRasterizer, VerticalMetrics};
