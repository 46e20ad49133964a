//! The particle field simulator.
//!
//! One `ParticleField` per mounted hero. It owns the particle pool, the target
//! points of the current word, the background static, the pointer and the
//! phase clocks. `tick` is the only place particle state changes and the only
//! place anything is drawn.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::api::config::{ConfigError, ConfigPatch, FieldConfig};
use crate::api::types::{FieldEvent, Phase, StartMode, Viewport};
use crate::core::phase::PhaseClock;
use crate::core::time::FrameClock;
use crate::extensions::easing::lerp;
use crate::renderer::traits::{FrameInfo, GlyphDraw, GlyphStyle, Ink, Layer, Palette, Surface};
use crate::systems::background::StaticField;
use crate::systems::particle::{random_glyph, DropParams, Particle};
use crate::systems::pointer::{repel_offset, PointerState, RepelParams};
use crate::systems::rng::Rng;
use crate::text::layout::{compute_targets, jitter_spread};
use crate::text::mask::{FontSpec, TextRasterizer};

/// Particle opacity at the start of the morph when fade-in is on.
const FADE_FROM: f32 = 0.85;

pub struct ParticleField<R: TextRasterizer> {
    config: FieldConfig,
    rasterizer: R,
    viewport: Viewport,
    word: String,
    particles: Vec<Particle>,
    targets: Vec<Vec2>,
    background: StaticField,
    pointer: PointerState,
    clock: PhaseClock,
    frames: FrameClock,
    rng: Rng,
    reduced_motion: bool,
    events: Vec<FieldEvent>,
    ready: bool,
    disposed: bool,
}

impl<R: TextRasterizer> ParticleField<R> {
    /// Create an empty field. Call `initialize` to seed a word.
    pub fn new(rasterizer: R, viewport: Viewport, config: FieldConfig, seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        let background = StaticField::build(&viewport, config.static_cell, config.static_density, &mut rng);
        Self {
            config,
            rasterizer,
            viewport,
            word: String::new(),
            particles: Vec::new(),
            targets: Vec::new(),
            background,
            pointer: PointerState::new(),
            clock: PhaseClock::default(),
            frames: FrameClock::new(),
            rng,
            reduced_motion: false,
            events: Vec::new(),
            ready: false,
            disposed: false,
        }
    }

    /// Start a run: build targets for `word` and seed one particle per target.
    pub fn initialize(&mut self, word: &str, config: FieldConfig, start: StartMode) {
        self.config = config;
        self.word = word.to_string();
        self.disposed = false;
        self.background = StaticField::build(
            &self.viewport,
            self.config.static_cell,
            self.config.static_density,
            &mut self.rng,
        );
        self.targets = compute_targets(word, &self.config, &self.viewport, &mut self.rasterizer, &mut self.rng);

        let spread = jitter_spread(self.config.sample_gap);
        let mut particles = Vec::with_capacity(self.targets.len());
        for &target in &self.targets {
            let particle = match start {
                StartMode::Drop => launched(target, &self.config, &self.viewport, &mut self.rng),
                StartMode::Continuity => {
                    Particle::near_target(target, spread, self.config.transition_jitter_ms, &mut self.rng)
                }
            };
            particles.push(particle);
        }
        self.particles = particles;
        self.clock.restart(start);
        self.frames.reset();

        log::info!(
            "letter field: {:?} with {} particles ({:?} start)",
            self.word,
            self.particles.len(),
            start
        );
        if !self.ready {
            self.ready = true;
            self.events.push(FieldEvent::Ready {
                particles: self.particles.len(),
            });
        }
    }

    /// Re-flow the existing pool into `word` without restarting the run.
    pub fn retarget(&mut self, word: &str) {
        if self.disposed {
            return;
        }
        let before = self.particles.len();
        self.word = word.to_string();
        self.rebuild_targets();
        self.clock.force_morph();
        log::debug!(
            "retarget {:?}: {} -> {} particles",
            self.word,
            before,
            self.particles.len()
        );
    }

    /// Resize the canvas. Rebuilds the background and the targets; the phase is kept.
    pub fn resize(&mut self, width: f32, height: f32, dpr: f32) {
        if self.disposed {
            return;
        }
        let viewport = Viewport::new(width, height, dpr);
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.rebuild_background();
        self.rebuild_targets();
        log::debug!(
            "resize to {}x{}@{}: {} particles",
            viewport.width,
            viewport.height,
            viewport.dpr,
            self.particles.len()
        );
    }

    /// Advance one display frame and draw it.
    ///
    /// Order within a frame is fixed: clear, background, physics, particles.
    pub fn tick<S: Surface>(&mut self, now_ms: f64, surface: &mut S) {
        if self.disposed {
            return;
        }
        let delta = self.frames.advance(now_ms);
        let before = self.clock.phase();
        let phase = self.clock.advance(now_ms, self.config.drop_window_ms());
        if before != phase {
            log::debug!("phase {:?} -> {:?} after {:.0}ms", before, phase, self.clock.elapsed_ms());
        }

        surface.begin_frame(&self.frame_info());
        self.background
            .draw(surface, now_ms, self.config.static_speed, self.config.glyph_size);

        self.pointer.smooth(self.config.pointer_smoothing, delta.multiplier);
        if self.reduced_motion {
            for p in &mut self.particles {
                p.settle();
            }
        } else {
            match phase {
                Phase::Drop => self.step_drop(delta.multiplier),
                Phase::Morph => self.step_morph(delta.frame_ms),
            }
        }

        self.draw_particles(surface, phase);
        surface.end_frame();
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer.move_to(Vec2::new(x, y));
    }

    pub fn pointer_leave(&mut self) {
        self.pointer.leave();
    }

    /// Snap particles straight onto their targets every frame.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Merge a validated partial update. A rejected patch changes nothing.
    pub fn update_config(&mut self, patch: &ConfigPatch) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        if let Err(err) = patch.apply_to(&mut next) {
            log::warn!("config patch rejected: {}", err);
            return Err(err);
        }
        self.apply_config(next);
        Ok(())
    }

    /// Replace the whole config. The run continues.
    pub fn replace_config(&mut self, config: FieldConfig) -> Result<(), ConfigError> {
        if let Err(err) = config.validate() {
            log::warn!("config rejected: {}", err);
            return Err(err);
        }
        self.apply_config(config);
        Ok(())
    }

    /// Tear down: drop the pool and ignore every later tick.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.particles = Vec::new();
        self.targets = Vec::new();
        self.background = StaticField::empty();
        self.pointer.leave();
        self.events.clear();
    }

    /// Take events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<FieldEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn targets(&self) -> &[Vec2] {
        &self.targets
    }

    pub fn background(&self) -> &StaticField {
        &self.background
    }

    pub fn phase(&self) -> Phase {
        self.clock.phase()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.clock.elapsed_ms()
    }

    pub fn morph_ms(&self) -> f64 {
        self.clock.morph_ms()
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn apply_config(&mut self, next: FieldConfig) {
        let relayout = self.config.layout_differs(&next);
        let rebackground = self.config.background_differs(&next);
        self.config = next;
        if self.disposed {
            return;
        }
        if rebackground {
            self.rebuild_background();
        }
        if relayout {
            self.rebuild_targets();
        }
    }

    fn rebuild_background(&mut self) {
        self.background = StaticField::build(
            &self.viewport,
            self.config.static_cell,
            self.config.static_density,
            &mut self.rng,
        );
    }

    /// Recompute targets for the current word and canvas, then resize the pool
    /// by appending near-target particles or truncating the tail. Survivors keep
    /// their position and velocity and get a new target and delay.
    fn rebuild_targets(&mut self) {
        let targets = compute_targets(
            &self.word,
            &self.config,
            &self.viewport,
            &mut self.rasterizer,
            &mut self.rng,
        );
        self.particles.truncate(targets.len());

        let spread = jitter_spread(self.config.sample_gap);
        let max_delay = self.config.transition_jitter_ms;
        for (i, &target) in targets.iter().enumerate() {
            if i < self.particles.len() {
                let p = &mut self.particles[i];
                p.target = target;
                p.delay_ms = self.rng.range(0.0, max_delay);
            } else {
                self.particles
                    .push(Particle::near_target(target, spread, max_delay, &mut self.rng));
            }
        }
        self.targets = targets;
    }

    fn step_drop(&mut self, multiplier: f32) {
        let params = DropParams {
            gravity: self.config.gravity,
            bounce: self.config.bounce,
            friction: self.config.friction,
            width: self.viewport.width,
            height: self.viewport.height,
        };
        for p in &mut self.particles {
            p.drop_step(&params, multiplier, &mut self.rng);
        }
    }

    fn step_morph(&mut self, frame_ms: f32) {
        let config = &self.config;
        let morph_ms = self.clock.morph_ms();
        let pointer = self.pointer.position();
        let repel = RepelParams {
            radius: config.repel_radius,
            force: config.repel_force,
            dead_zone: config.dead_zone,
            max_offset: config.max_dock_offset,
        };
        for p in &mut self.particles {
            let push = pointer
                .map(|at| repel_offset(p.pos, at, &repel))
                .unwrap_or(Vec2::ZERO);
            let eased = config.easing.apply(p.progress(morph_ms, config.transition_ms));
            p.morph_step(p.target + push, eased, config.morph_gain, frame_ms);
        }
    }

    fn draw_particles<S: Surface>(&self, surface: &mut S, phase: Phase) {
        let size = self.config.glyph_size;
        let morph_ms = self.clock.morph_ms();
        for p in &self.particles {
            surface.draw_glyph(&GlyphDraw {
                x: p.pos.x,
                y: p.pos.y,
                size,
                glyph: p.glyph,
                ink: Ink::Foreground,
                alpha: self.particle_alpha(p, phase, morph_ms),
                style: GlyphStyle::Fill,
                layer: Layer::Particles,
            });
        }
        if self.config.outline {
            for p in &self.particles {
                surface.draw_glyph(&GlyphDraw {
                    x: p.pos.x,
                    y: p.pos.y,
                    size,
                    glyph: p.glyph,
                    ink: Ink::Accent,
                    alpha: self.particle_alpha(p, phase, morph_ms),
                    style: GlyphStyle::Stroke,
                    layer: Layer::Particles,
                });
            }
        }
    }

    fn particle_alpha(&self, p: &Particle, phase: Phase, morph_ms: f64) -> f32 {
        if !self.config.fade_in || self.reduced_motion {
            return 1.0;
        }
        let eased = match phase {
            Phase::Drop => 0.0,
            Phase::Morph => self
                .config
                .easing
                .apply(p.progress(morph_ms, self.config.transition_ms)),
        };
        lerp(FADE_FROM, 1.0, eased)
    }

    fn frame_info(&self) -> FrameInfo {
        FrameInfo {
            viewport: self.viewport,
            palette: Palette {
                foreground: self.config.foreground,
                background: self.config.background,
                accent: self.config.accent,
            },
            font: FontSpec::new(
                self.config.font_family.clone(),
                self.config.font_weight,
                self.config.glyph_size,
            ),
        }
    }
}

/// A particle thrown from the launch disc toward `target`'s word.
fn launched(target: Vec2, config: &FieldConfig, viewport: &Viewport, rng: &mut Rng) -> Particle {
    let origin = Vec2::new(
        viewport.width * config.launch_origin[0],
        viewport.height * config.launch_origin[1],
    );
    let theta = rng.range(0.0, TAU);
    let radius = config.launch_radius * rng.next_f32().sqrt();
    let pos = origin + Vec2::new(theta.cos(), theta.sin()) * radius;

    let angle = (config.launch_angle + rng.centered(config.launch_spread)).to_radians();
    let speed = (config.launch_speed + rng.centered(2.0 * config.launch_speed_jitter)).max(0.0);
    let vel = Vec2::new(angle.cos(), angle.sin()) * speed;

    Particle::new(
        pos,
        vel,
        target,
        rng.range(0.0, config.transition_jitter_ms),
        random_glyph(rng),
    )
}
