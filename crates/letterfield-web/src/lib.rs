pub mod canvas;
pub mod listener;
pub mod render_loop;
pub mod runner;

pub use canvas::{CanvasRasterizer, CanvasSurface};
pub use listener::Listener;
pub use render_loop::RenderLoop;
pub use runner::FieldRunner;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, MediaQueryList, Window};

use letterfield::{
    ConfigPatch, FieldConfig, FieldEvent, FrameBuffer, GlyphInstance,
    InputEvent, StartMode, Viewport,
};

type BrowserRunner = FieldRunner<CanvasSurface, CanvasRasterizer>;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

static LOGGING: Once = Once::new();

fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    });
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn document(window: &Window) -> Result<Document, JsValue> {
    window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn parse_config(config_json: Option<String>) -> Result<FieldConfig, JsValue> {
    match config_json.as_deref() {
        Some(json) => FieldConfig::from_json(json).map_err(js_error),
        None => Ok(FieldConfig::default()),
    }
}

fn start_mode(continuity: bool) -> StartMode {
    if continuity {
        StartMode::Continuity
    } else {
        StartMode::Drop
    }
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

/// Canvas size in CSS pixels plus the current device pixel ratio.
fn measure(window: &Window, canvas: &HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    Viewport::new(
        rect.width() as f32,
        rect.height() as f32,
        window.device_pixel_ratio() as f32,
    )
}

fn reduced_motion_query(window: &Window) -> Option<MediaQueryList> {
    window.match_media(REDUCED_MOTION_QUERY).ok().flatten()
}

/// The letter-cloud hero mounted on one canvas.
///
/// Window resizes and changes to the reduced-motion preference are tracked
/// until `dispose`. Call `resize` yourself when the canvas changes size for
/// any other reason, e.g. from a `ResizeObserver`.
///
/// ```js
/// const hero = new HeroField(canvas, "HELLO", JSON.stringify({ sampleGap: 5 }), false);
/// hero.onReady((count) => console.log(`${count} particles`));
/// hero.start();
/// // later
/// hero.setWord("WORLD");
/// hero.dispose();
/// ```
#[wasm_bindgen]
pub struct HeroField {
    canvas: HtmlCanvasElement,
    runner: Rc<RefCell<BrowserRunner>>,
    on_ready: Rc<RefCell<Option<js_sys::Function>>>,
    render_loop: Option<RenderLoop>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl HeroField {
    /// Build the field for `word`. `config_json` is a full or partial config;
    /// `continuity` starts with letters already formed instead of the drop.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        word: &str,
        config_json: Option<String>,
        continuity: bool,
    ) -> Result<HeroField, JsValue> {
        init_logging();

        let config = parse_config(config_json)?;
        let window = window()?;
        let surface = CanvasSurface::new(canvas.clone())?;
        let rasterizer = CanvasRasterizer::new(&document(&window)?)?;
        let mut runner = FieldRunner::new(surface, rasterizer, measure(&window, &canvas), random_seed());

        let query = reduced_motion_query(&window);
        runner.set_reduced_motion(query.as_ref().is_some_and(MediaQueryList::matches));
        runner.init(word, config, start_mode(continuity));
        let runner = Rc::new(RefCell::new(runner));

        let mut listeners = Vec::with_capacity(2);
        {
            let runner = Rc::clone(&runner);
            let canvas = canvas.clone();
            let win = window.clone();
            listeners.push(Listener::attach(&window, "resize", move |_| {
                let vp = measure(&win, &canvas);
                runner
                    .borrow_mut()
                    .request_resize(vp.width, vp.height, vp.dpr);
            })?);
        }
        if let Some(query) = query {
            let runner = Rc::clone(&runner);
            let watched = query.clone();
            listeners.push(Listener::attach(&query, "change", move |_| {
                let reduced = watched.matches();
                log::info!("reduced motion preference changed: {}", reduced);
                runner.borrow_mut().set_reduced_motion(reduced);
            })?);
        }

        Ok(HeroField {
            canvas,
            runner,
            on_ready: Rc::new(RefCell::new(None)),
            render_loop: None,
            listeners,
        })
    }

    /// Start the animation loop. No-op while already running.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.render_loop.is_some() {
            return Ok(());
        }
        let runner = Rc::clone(&self.runner);
        let on_ready = Rc::clone(&self.on_ready);
        let render_loop = RenderLoop::start(move |now_ms| {
            // Release the runner before calling into JS, which may call back in
            let events = {
                let mut runner = runner.borrow_mut();
                runner.tick(now_ms);
                runner.take_events()
            };
            for event in events {
                match event {
                    FieldEvent::Ready { particles } => {
                        let callback = on_ready.borrow().clone();
                        if let Some(callback) = callback {
                            let count = JsValue::from(particles as u32);
                            if let Err(err) = callback.call1(&JsValue::NULL, &count) {
                                log::error!("onReady callback threw: {:?}", err);
                            }
                        }
                    }
                }
            }
        })?;
        self.render_loop = Some(render_loop);
        Ok(())
    }

    /// Cancel the pending frame. The field keeps its state and can be restarted.
    pub fn stop(&mut self) {
        self.render_loop = None;
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.render_loop.as_ref().is_some_and(RenderLoop::is_running)
    }

    /// Re-flow the particles into `word` on the next frame.
    #[wasm_bindgen(js_name = setWord)]
    pub fn set_word(&mut self, word: &str) {
        self.runner.borrow_mut().request_word(word);
    }

    /// Cycle through `words`, one every `interval_ms`.
    #[wasm_bindgen(js_name = setRotation)]
    pub fn set_rotation(&mut self, words: Vec<String>, interval_ms: f64) {
        self.runner.borrow_mut().set_rotation(words, interval_ms);
    }

    #[wasm_bindgen(js_name = clearRotation)]
    pub fn clear_rotation(&mut self) {
        self.runner.borrow_mut().clear_rotation();
    }

    /// Pointer position in client coordinates, e.g. `PointerEvent.clientX/Y`.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) {
        let rect = self.canvas.get_bounding_client_rect();
        let x = client_x - rect.left() as f32;
        let y = client_y - rect.top() as f32;
        self.runner
            .borrow_mut()
            .push_input(InputEvent::PointerMove { x, y });
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.runner.borrow_mut().push_input(InputEvent::PointerLeave);
    }

    /// Re-measure the canvas.
    pub fn resize(&mut self) -> Result<(), JsValue> {
        let vp = measure(&window()?, &self.canvas);
        self.runner
            .borrow_mut()
            .request_resize(vp.width, vp.height, vp.dpr);
        Ok(())
    }

    /// Merge a partial config given as JSON. Rejected patches change nothing.
    #[wasm_bindgen(js_name = updateConfig)]
    pub fn update_config(&mut self, json: &str) -> Result<(), JsValue> {
        let patch = ConfigPatch::from_json(json).map_err(js_error)?;
        self.runner
            .borrow_mut()
            .update_config(&patch)
            .map_err(js_error)
    }

    /// Override the detected preference until it next changes.
    #[wasm_bindgen(js_name = setReducedMotion)]
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.runner.borrow_mut().set_reduced_motion(reduced);
    }

    /// Register the callback fired once with the particle count after the first
    /// frame. Register before `start` to receive it.
    #[wasm_bindgen(js_name = onReady)]
    pub fn on_ready(&mut self, callback: js_sys::Function) {
        *self.on_ready.borrow_mut() = Some(callback);
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> u32 {
        self.runner.borrow().field().particles().len() as u32
    }

    /// Stop the loop, detach listeners and release the particle pool.
    /// The instance is inert afterwards.
    pub fn dispose(&mut self) {
        self.stop();
        self.listeners.clear();
        self.runner.borrow_mut().dispose();
        *self.on_ready.borrow_mut() = None;
        log::info!("letter field disposed");
    }
}

/// The simulator without a visible canvas, for hosts that draw themselves.
///
/// Each `tick` records the frame as flat glyph instances of
/// `floatsPerInstance()` floats: x, y, size, code point, alpha, ink
/// (0 foreground, 1 accent), style (0 fill, 1 stroke), layer (0 background,
/// 1 particles). Read them zero-copy through `instancesPtr` and wasm memory, or
/// copy them with `instances`.
#[wasm_bindgen]
pub struct HeadlessField {
    runner: FieldRunner<FrameBuffer, CanvasRasterizer>,
}

#[wasm_bindgen]
impl HeadlessField {
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f32,
        height: f32,
        dpr: f32,
        word: &str,
        config_json: Option<String>,
        continuity: bool,
    ) -> Result<HeadlessField, JsValue> {
        init_logging();

        let config = parse_config(config_json)?;
        let rasterizer = CanvasRasterizer::new(&document(&window()?)?)?;
        let viewport = Viewport::new(width, height, dpr);
        let mut runner = FieldRunner::new(FrameBuffer::new(), rasterizer, viewport, random_seed());
        runner.init(word, config, start_mode(continuity));
        Ok(HeadlessField { runner })
    }

    /// Advance and record one frame. Returns true on the frame the field
    /// first becomes ready.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.runner.tick(now_ms);
        self.runner
            .take_events()
            .iter()
            .any(|event| matches!(event, FieldEvent::Ready { .. }))
    }

    #[wasm_bindgen(js_name = setWord)]
    pub fn set_word(&mut self, word: &str) {
        self.runner.request_word(word);
    }

    /// Pointer position in canvas-local CSS pixels.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.runner.push_input(InputEvent::PointerMove { x, y });
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.runner.push_input(InputEvent::PointerLeave);
    }

    pub fn resize(&mut self, width: f32, height: f32, dpr: f32) {
        self.runner.request_resize(width, height, dpr);
    }

    #[wasm_bindgen(js_name = updateConfig)]
    pub fn update_config(&mut self, json: &str) -> Result<(), JsValue> {
        let patch = ConfigPatch::from_json(json).map_err(js_error)?;
        self.runner.update_config(&patch).map_err(js_error)
    }

    #[wasm_bindgen(js_name = setReducedMotion)]
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.runner.set_reduced_motion(reduced);
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> u32 {
        self.runner.field().particles().len() as u32
    }

    #[wasm_bindgen(js_name = floatsPerInstance)]
    pub fn floats_per_instance() -> u32 {
        GlyphInstance::FLOATS as u32
    }

    #[wasm_bindgen(js_name = instancesPtr)]
    pub fn instances_ptr(&self) -> *const f32 {
        self.runner.surface().instances_ptr()
    }

    #[wasm_bindgen(js_name = instanceCount)]
    pub fn instance_count(&self) -> u32 {
        self.runner.surface().instance_count()
    }

    /// Copy of the last frame's instance data.
    pub fn instances(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.runner.surface().as_floats())
    }

    pub fn dispose(&mut self) {
        self.runner.dispose();
    }
}
