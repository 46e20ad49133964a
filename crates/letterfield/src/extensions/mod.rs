// extensions/mod.rs
//
// Optional helpers layered on top of the simulator core.
// The field uses the easing curves; hosts opt in to word rotation.

pub mod easing;
pub mod rotation;

pub use easing::{Easing, clamp01, lerp};
pub use rotation::WordRotation;
