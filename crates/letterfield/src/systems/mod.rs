pub mod background;
pub mod particle;
pub mod pointer;
pub mod rng;

pub use background::{StaticField, StaticGlyph};
pub use particle::{DropParams, Particle, GLYPH_ALPHABET};
pub use pointer::{repel_offset, PointerState, RepelParams};
pub use rng::Rng;
