pub mod field;
pub mod phase;
pub mod time;

pub use field::ParticleField;
pub use phase::PhaseClock;
pub use time::{FrameClock, FrameDelta, NOMINAL_FRAME_MS};
