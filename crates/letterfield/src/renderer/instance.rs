use bytemuck::{Pod, Zeroable};

use super::traits::{FrameInfo, GlyphDraw, GlyphStyle, Ink, Layer, Surface};

/// Per-glyph render record, flat for zero-copy reads from JS.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GlyphInstance {
    /// Center X in canvas CSS pixels.
    pub x: f32,
    /// Center Y in canvas CSS pixels.
    pub y: f32,
    /// Glyph size in CSS pixels.
    pub size: f32,
    /// Unicode scalar value of the glyph.
    pub code: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// 0 = foreground, 1 = accent.
    pub ink: f32,
    /// 0 = fill, 1 = stroke.
    pub style: f32,
    /// 0 = background field, 1 = particles.
    pub layer: f32,
}

impl GlyphInstance {
    pub const FLOATS: usize = 8;

    pub fn glyph(&self) -> char {
        char::from_u32(self.code as u32).unwrap_or('?')
    }
}

impl From<&GlyphDraw> for GlyphInstance {
    fn from(g: &GlyphDraw) -> Self {
        Self {
            x: g.x,
            y: g.y,
            size: g.size,
            code: g.glyph as u32 as f32,
            alpha: g.alpha,
            ink: match g.ink {
                Ink::Foreground => 0.0,
                Ink::Accent => 1.0,
            },
            style: match g.style {
                GlyphStyle::Fill => 0.0,
                GlyphStyle::Stroke => 1.0,
            },
            layer: match g.layer {
                Layer::Background => 0.0,
                Layer::Particles => 1.0,
            },
        }
    }
}

/// Recording surface: keeps the last frame as a flat instance list.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    pub instances: Vec<GlyphInstance>,
    /// Frame state of the last `begin_frame`.
    pub frame: Option<FrameInfo>,
    frames: u64,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(4096),
            frame: None,
            frames: 0,
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Frames begun since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Instances of one layer, in draw order.
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &GlyphInstance> {
        let wanted = match layer {
            Layer::Background => 0.0,
            Layer::Particles => 1.0,
        };
        self.instances.iter().filter(move |i| i.layer == wanted)
    }

    /// Instance data as raw floats.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for zero-copy reads from wasm memory.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Surface for FrameBuffer {
    fn begin_frame(&mut self, frame: &FrameInfo) {
        self.instances.clear();
        self.frame = Some(frame.clone());
        self.frames += 1;
    }

    fn draw_glyph(&mut self, glyph: &GlyphDraw) {
        self.instances.push(GlyphInstance::from(glyph));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(layer: Layer) -> GlyphDraw {
        GlyphDraw {
            x: 1.0,
            y: 2.0,
            size: 9.0,
            glyph: 'Q',
            ink: Ink::Accent,
            alpha: 0.5,
            style: GlyphStyle::Stroke,
            layer,
        }
    }

    #[test]
    fn glyph_instance_is_8_floats() {
        assert_eq!(std::mem::size_of::<GlyphInstance>(), 32);
        assert_eq!(GlyphInstance::FLOATS, 8);
    }

    #[test]
    fn instance_encodes_draw() {
        let inst = GlyphInstance::from(&draw(Layer::Particles));
        assert_eq!(inst.glyph(), 'Q');
        assert_eq!(inst.ink, 1.0);
        assert_eq!(inst.style, 1.0);
        assert_eq!(inst.layer, 1.0);
    }

    #[test]
    fn frame_buffer_records_and_splits_layers() {
        let mut buf = FrameBuffer::new();
        buf.draw_glyph(&draw(Layer::Background));
        buf.draw_glyph(&draw(Layer::Particles));
        buf.draw_glyph(&draw(Layer::Particles));
        assert_eq!(buf.instance_count(), 3);
        assert_eq!(buf.layer(Layer::Particles).count(), 2);
        assert_eq!(buf.as_floats().len(), 24);
        assert_eq!(buf.instances_ptr(), buf.as_floats().as_ptr());
        assert_eq!(buf.as_floats()[GlyphInstance::FLOATS + 7], 1.0);
    }
}
