//! Pointer tracking and the "dock" repulsion it exerts on targets.

use glam::Vec2;

/// Scale applied to the configured repel force.
pub const REPEL_FORCE_SCALE: f32 = 0.8;

/// Raw and smoothed pointer positions in canvas-local CSS pixels.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    target: Option<Vec2>,
    smoothed: Option<Vec2>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest raw pointer position.
    /// A pointer entering the canvas starts its smoothed position there.
    pub fn move_to(&mut self, pos: Vec2) {
        if !pos.is_finite() {
            return;
        }
        self.target = Some(pos);
        if self.smoothed.is_none() {
            self.smoothed = Some(pos);
        }
    }

    /// The pointer left the canvas; repulsion stops.
    pub fn leave(&mut self) {
        self.target = None;
        self.smoothed = None;
    }

    /// Exponentially filter the smoothed position toward the raw one.
    pub fn smooth(&mut self, smoothing: f32, multiplier: f32) {
        if let (Some(target), Some(smoothed)) = (self.target, self.smoothed.as_mut()) {
            let factor = (smoothing * multiplier).clamp(0.0, 1.0);
            *smoothed += (target - *smoothed) * factor;
        }
    }

    /// Smoothed position used by the force calculation.
    pub fn position(&self) -> Option<Vec2> {
        self.smoothed
    }
}

/// Repulsion constants, copied from the live config each tick.
#[derive(Debug, Clone, Copy)]
pub struct RepelParams {
    pub radius: f32,
    pub force: f32,
    pub dead_zone: f32,
    pub max_offset: f32,
}

/// Bounded push added to a particle's target, away from the pointer.
///
/// Zero outside `radius` and inside `dead_zone`. Between them the magnitude is
/// `(1 - n)² × force × 0.8`, capped at `max_offset`, where `n` is the distance
/// beyond the dead-zone normalized over the remaining radius.
pub fn repel_offset(particle: Vec2, pointer: Vec2, params: &RepelParams) -> Vec2 {
    let away = particle - pointer;
    let dist = away.length();
    if dist >= params.radius || dist <= params.dead_zone {
        return Vec2::ZERO;
    }
    let span = params.radius - params.dead_zone;
    if span <= f32::EPSILON {
        return Vec2::ZERO;
    }
    let normalized = (dist - params.dead_zone) / span;
    let falloff = (1.0 - normalized) * (1.0 - normalized);
    let magnitude = (falloff * params.force * REPEL_FORCE_SCALE).min(params.max_offset);
    away / dist * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RepelParams {
        RepelParams {
            radius: 120.0,
            force: 40.0,
            dead_zone: 8.0,
            max_offset: 28.0,
        }
    }

    #[test]
    fn dead_zone_contributes_nothing() {
        let pointer = Vec2::new(100.0, 100.0);
        for d in [0.0, 1.0, 4.0, 8.0] {
            let offset = repel_offset(pointer + Vec2::new(d, 0.0), pointer, &params());
            assert_eq!(offset, Vec2::ZERO, "distance {}", d);
        }
    }

    #[test]
    fn outside_radius_contributes_nothing() {
        let offset = repel_offset(Vec2::new(300.0, 0.0), Vec2::ZERO, &params());
        assert_eq!(offset, Vec2::ZERO);
    }

    #[test]
    fn push_points_away_and_is_capped() {
        let pointer = Vec2::new(0.0, 0.0);
        let offset = repel_offset(Vec2::new(0.0, 10.0), pointer, &params());
        assert_eq!(offset.x, 0.0);
        assert!(offset.y > 0.0);
        // Just past the dead-zone the raw magnitude (≈31.5) exceeds the cap.
        assert!((offset.length() - 28.0).abs() < 1e-4);
    }

    #[test]
    fn push_falls_off_with_distance() {
        let pointer = Vec2::ZERO;
        let near = repel_offset(Vec2::new(60.0, 0.0), pointer, &params()).length();
        let far = repel_offset(Vec2::new(110.0, 0.0), pointer, &params()).length();
        assert!(near > far);
        assert!(far > 0.0);
    }

    #[test]
    fn smoothing_converges_on_raw_position() {
        let mut pointer = PointerState::new();
        pointer.move_to(Vec2::new(0.0, 0.0));
        pointer.move_to(Vec2::new(100.0, 0.0));
        pointer.smooth(0.18, 1.0);
        let first = pointer.position().unwrap().x;
        assert!((first - 18.0).abs() < 1e-4);
        for _ in 0..200 {
            pointer.smooth(0.18, 1.0);
        }
        assert!((pointer.position().unwrap().x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn smoothing_scales_with_frame_multiplier() {
        let mut slow = PointerState::new();
        slow.move_to(Vec2::ZERO);
        slow.move_to(Vec2::new(100.0, 0.0));
        slow.smooth(0.18, 2.0);
        assert!((slow.position().unwrap().x - 36.0).abs() < 1e-4);

        let mut fast = PointerState::new();
        fast.move_to(Vec2::ZERO);
        fast.move_to(Vec2::new(100.0, 0.0));
        fast.smooth(0.18, 0.5);
        assert!((fast.position().unwrap().x - 9.0).abs() < 1e-4);

        // The factor saturates at 1: the filter never overshoots.
        let mut snap = PointerState::new();
        snap.move_to(Vec2::ZERO);
        snap.move_to(Vec2::new(100.0, 0.0));
        snap.smooth(0.8, 2.0);
        assert_eq!(snap.position(), Some(Vec2::new(100.0, 0.0)));
    }

    #[test]
    fn leave_clears_pointer() {
        let mut pointer = PointerState::new();
        pointer.move_to(Vec2::new(5.0, 5.0));
        pointer.leave();
        assert!(pointer.position().is_none());
    }
}
