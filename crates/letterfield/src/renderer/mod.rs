pub mod instance;
pub mod traits;

// Re-export key types for convenient access
pub use instance::{FrameBuffer, GlyphInstance};
pub use traits::{FrameInfo, GlyphDraw, GlyphStyle, Ink, Layer, Palette, Surface};
