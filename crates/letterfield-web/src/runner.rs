use letterfield::{
    ConfigError, ConfigPatch, FieldConfig, FieldEvent,
    InputEvent, InputQueue, ParticleField,
    StartMode, Surface, TextRasterizer, Viewport, WordRotation,
};

/// Generic field runner that wires a `ParticleField` to a surface and the host.
///
/// The browser export (`HeroField`) owns one runner per mounted canvas, because
/// wasm-bindgen cannot export generic structs directly. Host calls only record
/// requests; everything is applied at the start of the next `tick`, so a burst
/// of word or size changes between frames collapses to the latest one.
pub struct FieldRunner<S: Surface, R: TextRasterizer> {
    field: ParticleField<R>,
    surface: S,
    input: InputQueue,
    rotation: Option<WordRotation>,
    pending_word: Option<String>,
    pending_viewport: Option<Viewport>,
    initialized: bool,
}

impl<S: Surface, R: TextRasterizer> FieldRunner<S, R> {
    pub fn new(surface: S, rasterizer: R, viewport: Viewport, seed: u64) -> Self {
        Self {
            field: ParticleField::new(rasterizer, viewport, FieldConfig::default(), seed),
            surface,
            input: InputQueue::new(),
            rotation: None,
            pending_word: None,
            pending_viewport: None,
            initialized: false,
        }
    }

    /// Build the first scene. Call once after construction.
    pub fn init(&mut self, word: &str, config: FieldConfig, start: StartMode) {
        self.field.initialize(word, config, start);
        self.initialized = true;
    }

    /// Show `word` from the next frame on. Replaces any word not yet applied.
    pub fn request_word(&mut self, word: impl Into<String>) {
        self.pending_word = Some(word.into());
    }

    /// Resize from the next frame on. Replaces any size not yet applied.
    pub fn request_resize(&mut self, width: f32, height: f32, dpr: f32) {
        self.pending_viewport = Some(Viewport::new(width, height, dpr));
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Cycle through `words`, one every `interval_ms`.
    pub fn set_rotation(&mut self, words: Vec<String>, interval_ms: f64) {
        let rotation = WordRotation::new(words, interval_ms);
        if let Some(first) = rotation.current() {
            self.pending_word = Some(first.to_string());
        }
        self.rotation = Some(rotation);
    }

    pub fn clear_rotation(&mut self) {
        self.rotation = None;
    }

    pub fn update_config(&mut self, patch: &ConfigPatch) -> Result<(), ConfigError> {
        self.field.update_config(patch)
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.field.set_reduced_motion(reduced);
    }

    /// Run one display frame: apply pending requests, feed input, simulate, draw.
    pub fn tick(&mut self, now_ms: f64) {
        if !self.initialized || self.field.is_disposed() {
            return;
        }

        if let Some(vp) = self.pending_viewport.take() {
            self.field.resize(vp.width, vp.height, vp.dpr);
        }

        // An explicit word restarts the interval instead of consuming a rotation slot
        if let Some(rotation) = self.rotation.as_mut() {
            if self.pending_word.is_some() {
                rotation.rearm(now_ms);
            } else if let Some(next) = rotation.poll(now_ms) {
                self.pending_word = Some(next.to_string());
            }
        }
        if let Some(word) = self.pending_word.take() {
            if word != self.field.word() {
                self.field.retarget(&word);
            }
        }

        for event in self.input.drain() {
            match event {
                InputEvent::PointerMove { x, y } => self.field.pointer_move(x, y),
                InputEvent::PointerLeave => self.field.pointer_leave(),
            }
        }

        self.field.tick(now_ms, &mut self.surface);
    }

    /// Events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<FieldEvent> {
        self.field.drain_events()
    }

    /// Tear down the field and drop everything pending.
    pub fn dispose(&mut self) {
        self.field.dispose();
        self.input.clear();
        self.rotation = None;
        self.pending_word = None;
        self.pending_viewport = None;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn field(&self) -> &ParticleField<R> {
        &self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use letterfield::{BlockFont, FrameBuffer, Layer, Phase, NOMINAL_FRAME_MS};

    fn runner() -> FieldRunner<FrameBuffer, BlockFont> {
        let mut r = FieldRunner::new(
            FrameBuffer::new(),
            BlockFont::new(),
            Viewport::new(800.0, 400.0, 1.0),
            11,
        );
        r.init("HELLO", FieldConfig::default(), StartMode::Drop);
        r
    }

    #[test]
    fn tick_before_init_is_ignored() {
        let mut r = FieldRunner::new(FrameBuffer::new(), BlockFont::new(), Viewport::default(), 1);
        r.tick(0.0);
        assert_eq!(r.surface().frames(), 0);
        assert!(!r.is_initialized());
    }

    #[test]
    fn tick_draws_a_frame() {
        let mut r = runner();
        r.tick(0.0);
        assert_eq!(r.surface().frames(), 1);
        assert_eq!(
            r.surface().layer(Layer::Particles).count(),
            r.field().particles().len()
        );
    }

    #[test]
    fn latest_word_request_wins() {
        let mut r = runner();
        r.tick(0.0);
        r.request_word("ONE");
        r.request_word("TWO");
        r.tick(NOMINAL_FRAME_MS);
        assert_eq!(r.field().word(), "TWO");
        assert_eq!(r.field().phase(), Phase::Morph);
    }

    #[test]
    fn same_word_does_not_restart_morph() {
        let mut r = runner();
        r.init("HI", FieldConfig::default(), StartMode::Continuity);
        r.tick(0.0);
        r.tick(500.0);
        r.request_word("HI");
        r.tick(600.0);
        assert_eq!(r.field().morph_ms(), 600.0);
    }

    #[test]
    fn latest_resize_wins() {
        let mut r = runner();
        r.request_resize(100.0, 100.0, 1.0);
        r.request_resize(640.0, 320.0, 2.0);
        r.tick(0.0);
        assert_eq!(r.field().viewport(), Viewport::new(640.0, 320.0, 2.0));
        assert_eq!(r.field().particles().len(), r.field().targets().len());
    }

    #[test]
    fn input_is_drained_into_the_pointer() {
        let mut r = runner();
        r.init("I", FieldConfig::default(), StartMode::Continuity);
        let mut now = 0.0;
        for _ in 0..400 {
            r.tick(now);
            now += NOMINAL_FRAME_MS;
        }
        let target = r.field().particles()[0].target;
        r.push_input(InputEvent::PointerMove { x: target.x + 30.0, y: target.y });
        for _ in 0..30 {
            r.tick(now);
            now += NOMINAL_FRAME_MS;
        }
        assert_ne!(r.field().particles()[0].pos, target);
    }

    #[test]
    fn rotation_advances_words() {
        let mut r = runner();
        r.set_rotation(vec!["AAA".into(), "BBB".into()], 1000.0);
        r.tick(0.0);
        assert_eq!(r.field().word(), "AAA");
        r.tick(500.0);
        assert_eq!(r.field().word(), "AAA");
        r.tick(1000.0);
        assert_eq!(r.field().word(), "BBB");
        r.clear_rotation();
        r.tick(5000.0);
        assert_eq!(r.field().word(), "BBB");
    }

    #[test]
    fn manual_word_does_not_skip_rotation() {
        let mut r = runner();
        r.set_rotation(vec!["AAA".into(), "BBB".into(), "CCC".into()], 1000.0);
        r.tick(0.0);
        assert_eq!(r.field().word(), "AAA");

        r.request_word("XYZ");
        r.tick(1000.0);
        assert_eq!(r.field().word(), "XYZ");
        r.tick(1999.0);
        assert_eq!(r.field().word(), "XYZ");
        r.tick(2000.0);
        assert_eq!(r.field().word(), "BBB");
        r.tick(3000.0);
        assert_eq!(r.field().word(), "CCC");
    }

    #[test]
    fn reduced_motion_can_change_mid_run() {
        let mut r = runner();
        r.tick(0.0);
        r.tick(NOMINAL_FRAME_MS);
        assert!(r.field().particles().iter().any(|p| p.pos != p.target));

        r.set_reduced_motion(true);
        r.tick(2.0 * NOMINAL_FRAME_MS);
        assert!(r.field().particles().iter().all(|p| p.pos == p.target));

        r.set_reduced_motion(false);
        r.request_resize(640.0, 320.0, 1.0);
        r.tick(3.0 * NOMINAL_FRAME_MS);
        assert!(!r.field().reduced_motion());
        assert_eq!(r.field().particles().len(), r.field().targets().len());
    }

    #[test]
    fn ready_event_reaches_host_once() {
        let mut r = runner();
        r.tick(0.0);
        let events = r.take_events();
        assert_eq!(events.len(), 1);
        assert!(r.take_events().is_empty());
    }

    #[test]
    fn dispose_drops_pending_work() {
        let mut r = runner();
        r.tick(0.0);
        r.request_word("LATER");
        r.push_input(InputEvent::PointerLeave);
        r.dispose();
        r.tick(16.0);
        assert_eq!(r.surface().frames(), 1);
        assert_eq!(r.field().word(), "HELLO");
        assert!(r.field().particles().is_empty());
    }
}
