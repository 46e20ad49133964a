//! Canvas 2D implementations of the simulator's text and drawing seams.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use letterfield::{
    FontSpec, FrameInfo, GlyphDraw, GlyphMask, GlyphStyle, Ink, Palette,
    PlacedGlyph, Surface, TextRasterizer, VerticalMetrics,
};

/// Outline width for the stroke pass, in CSS pixels.
const STROKE_WIDTH: f64 = 1.0;

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// Renders word masks on a detached offscreen canvas.
pub struct CanvasRasterizer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRasterizer {
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(JsValue::from)?;
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, ctx })
    }
}

impl TextRasterizer for CanvasRasterizer {
    fn advance(&mut self, ch: char, font: &FontSpec) -> f32 {
        self.ctx.set_font(&font.css());
        let mut buf = [0u8; 4];
        match self.ctx.measure_text(ch.encode_utf8(&mut buf)) {
            Ok(m) => m.width() as f32,
            Err(err) => {
                log::warn!("measureText failed for {:?}: {:?}", ch, err);
                font.size_px * 0.6
            }
        }
    }

    fn metrics(&mut self, font: &FontSpec) -> VerticalMetrics {
        self.ctx.set_font(&font.css());
        match self.ctx.measure_text("M") {
            Ok(m) => VerticalMetrics {
                ascent: m.actual_bounding_box_ascent() as f32,
                descent: m.actual_bounding_box_descent() as f32,
            },
            Err(err) => {
                log::warn!("measureText failed: {:?}", err);
                VerticalMetrics {
                    ascent: font.size_px * 0.8,
                    descent: font.size_px * 0.2,
                }
            }
        }
    }

    fn rasterize(&mut self, glyphs: &[PlacedGlyph], font: &FontSpec, width: u32, height: u32) -> GlyphMask {
        // Setting the size also clears the canvas and resets context state
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.ctx.set_font(&font.css());
        self.ctx.set_text_align("left");
        self.ctx.set_text_baseline("alphabetic");
        self.ctx.set_fill_style_str("#fff");

        let mut buf = [0u8; 4];
        for glyph in glyphs {
            let text = glyph.ch.encode_utf8(&mut buf);
            if let Err(err) = self.ctx.fill_text(text, glyph.x as f64, glyph.baseline as f64) {
                log::warn!("fillText failed for {:?}: {:?}", glyph.ch, err);
            }
        }

        match self.ctx.get_image_data(0.0, 0.0, width as f64, height as f64) {
            Ok(image) => GlyphMask::from_rgba(width, height, &image.data().0),
            Err(err) => {
                log::error!("getImageData failed: {:?}", err);
                GlyphMask::new(width, height)
            }
        }
    }
}

/// Draws frames onto the visible hero canvas.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    family: String,
    weight: u16,
    /// Font size last set on the context.
    font_px: Option<f32>,
    /// CSS colors for foreground and accent ink, resolved once per frame.
    inks: [String; 2],
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        Ok(Self {
            canvas,
            ctx,
            family: String::new(),
            weight: 400,
            font_px: None,
            inks: [String::new(), String::new()],
        })
    }

    fn ink_css(&self, ink: Ink) -> &str {
        match ink {
            Ink::Foreground => &self.inks[0],
            Ink::Accent => &self.inks[1],
        }
    }

    fn set_palette(&mut self, palette: &Palette) {
        self.inks = [
            palette.resolve(Ink::Foreground).to_css(),
            palette.resolve(Ink::Accent).to_css(),
        ];
    }
}

impl Surface for CanvasSurface {
    fn begin_frame(&mut self, frame: &FrameInfo) {
        let vp = frame.viewport;
        let (w, h) = (vp.device_width(), vp.device_height());
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
        let dpr = vp.dpr as f64;
        if let Err(err) = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0) {
            log::warn!("setTransform failed: {:?}", err);
        }

        self.ctx.set_global_alpha(1.0);
        self.ctx.set_fill_style_str(&frame.palette.background.to_css());
        self.ctx.fill_rect(0.0, 0.0, vp.width as f64, vp.height as f64);

        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_line_width(STROKE_WIDTH);
        self.family = frame.font.family.clone();
        self.weight = frame.font.weight;
        self.font_px = None;
        self.set_palette(&frame.palette);
    }

    fn draw_glyph(&mut self, glyph: &GlyphDraw) {
        if glyph.alpha <= 0.0 {
            return;
        }
        if self.font_px != Some(glyph.size) {
            let font = FontSpec::new(self.family.as_str(), self.weight, glyph.size);
            self.ctx.set_font(&font.css());
            self.font_px = Some(glyph.size);
        }
        self.ctx.set_global_alpha(glyph.alpha as f64);

        let mut buf = [0u8; 4];
        let text = glyph.glyph.encode_utf8(&mut buf);
        let (x, y) = (glyph.x as f64, glyph.y as f64);
        let drawn = match glyph.style {
            GlyphStyle::Fill => {
                self.ctx.set_fill_style_str(self.ink_css(glyph.ink));
                self.ctx.fill_text(text, x, y)
            }
            GlyphStyle::Stroke => {
                self.ctx.set_stroke_style_str(self.ink_css(glyph.ink));
                self.ctx.stroke_text(text, x, y)
            }
        };
        if let Err(err) = drawn {
            log::trace!("glyph draw failed: {:?}", err);
        }
    }

    fn end_frame(&mut self) {
        self.ctx.set_global_alpha(1.0);
    }
}
