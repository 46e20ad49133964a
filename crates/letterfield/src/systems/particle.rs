//! A pooled letter particle and its two integrators.

use glam::Vec2;

use super::rng::Rng;

/// Characters a particle may display. Fixed for the particle's lifetime.
pub const GLYPH_ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    '#', '$', '%', '&', '*', '+', '=', '?', '@', '/',
];

/// Ground sits this far above the bottom edge.
pub const GROUND_MARGIN: f32 = 10.0;
/// Walls sit this far inside the left and right edges.
pub const WALL_MARGIN: f32 = 8.0;
pub const WALL_RESTITUTION: f32 = 0.7;
/// Vertical speeds below this snap to rest on ground contact.
pub const REST_SPEED: f32 = 0.12;
pub const GRAVITY_SCALE: f32 = 0.08;
/// Total spread of the horizontal kick added on ground contact.
pub const GROUND_NOISE: f32 = 0.2;

/// Gain applied even at zero morph progress.
pub const BASE_GAIN: f32 = 0.04;
/// Frame length the morph gain is calibrated for.
pub const GAIN_REFERENCE_MS: f32 = 16.67;
/// Per-axis distance under which a particle snaps onto its goal.
pub const SNAP_DISTANCE: f32 = 0.05;

/// Per-tick drop-phase constants.
#[derive(Debug, Clone, Copy)]
pub struct DropParams {
    pub gravity: f32,
    pub bounce: f32,
    pub friction: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Vec2,
    /// Delay before this particle starts its morph, in milliseconds.
    pub delay_ms: f32,
    pub glyph: char,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, target: Vec2, delay_ms: f32, glyph: char) -> Self {
        Self { pos, vel, target, delay_ms, glyph }
    }

    /// A resting particle placed within `jitter / 2` per axis of its target.
    pub fn near_target(target: Vec2, jitter: f32, max_delay_ms: f32, rng: &mut Rng) -> Self {
        let pos = target + Vec2::new(rng.centered(jitter), rng.centered(jitter));
        Self::new(pos, Vec2::ZERO, target, rng.range(0.0, max_delay_ms), random_glyph(rng))
    }

    /// Advance one drop-phase step: gravity, ground bounce, wall bounce.
    pub fn drop_step(&mut self, params: &DropParams, multiplier: f32, rng: &mut Rng) {
        self.vel.y += params.gravity * GRAVITY_SCALE * multiplier;
        self.pos += self.vel * multiplier;

        let ground = params.height - GROUND_MARGIN;
        if self.pos.y > ground {
            self.pos.y = ground;
            self.vel.y *= params.bounce;
            self.vel.x = self.vel.x * params.friction + rng.centered(GROUND_NOISE);
            if self.vel.y.abs() < REST_SPEED {
                self.vel.y = 0.0;
            }
        }

        let left = WALL_MARGIN;
        let right = (params.width - WALL_MARGIN).max(left);
        if self.pos.x < left {
            self.pos.x = left;
            self.vel.x = self.vel.x.abs() * WALL_RESTITUTION;
        } else if self.pos.x > right {
            self.pos.x = right;
            self.vel.x = -self.vel.x.abs() * WALL_RESTITUTION;
        }
    }

    /// Move toward `goal` with a frame-rate independent exponential approach.
    ///
    /// `eased` is this particle's eased morph progress in [0, 1].
    pub fn morph_step(&mut self, goal: Vec2, eased: f32, morph_gain: f32, frame_ms: f32) {
        let gain = (BASE_GAIN + eased * morph_gain).clamp(0.0, 1.0);
        let applied = 1.0 - (1.0 - gain).powf(frame_ms / GAIN_REFERENCE_MS);
        self.pos += (goal - self.pos) * applied;

        let rest = goal - self.pos;
        if rest.x.abs() < SNAP_DISTANCE && rest.y.abs() < SNAP_DISTANCE {
            self.pos = goal;
        }
    }

    /// Put the particle exactly on its target, at rest.
    pub fn settle(&mut self) {
        self.pos = self.target;
        self.vel = Vec2::ZERO;
    }

    /// Local morph progress in [0, 1] before easing.
    pub fn progress(&self, morph_ms: f64, transition_ms: f32) -> f32 {
        let local = (morph_ms as f32 - self.delay_ms) / transition_ms.max(1.0);
        crate::extensions::easing::clamp01(local)
    }
}

pub fn random_glyph(rng: &mut Rng) -> char {
    rng.pick(GLYPH_ALPHABET).copied().unwrap_or('#')
}
