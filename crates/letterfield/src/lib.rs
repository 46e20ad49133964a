pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod text;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, ConfigPatch, FieldConfig};
pub use api::types::{Color, FieldEvent, Phase, StartMode, Viewport};
pub use core::field::ParticleField;
pub use core::phase::PhaseClock;
pub use core::time::{FrameClock, FrameDelta, NOMINAL_FRAME_MS};
pub use systems::particle::Particle;
pub use systems::background::StaticField;
pub use systems::rng::Rng;
pub use renderer::instance::{FrameBuffer, GlyphInstance};
pub use renderer::traits::{FrameInfo, GlyphDraw, GlyphStyle, Ink, Layer, Palette, Surface};
pub use input::queue::{InputEvent, InputQueue};
pub use text::block_font::BlockFont;
pub use text::mask::{FontSpec, GlyphMask, PlacedGlyph, TextRasterizer, VerticalMetrics};

// Extensions: optional helpers
pub use extensions::{Easing, WordRotation};
