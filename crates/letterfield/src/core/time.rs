/// Length of a nominal 60 Hz display frame, in milliseconds.
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;

/// Smallest and largest frame multiplier the integrator accepts.
/// Long frames (tab backgrounding) are capped so integration never explodes.
pub const MIN_FRAME_MULTIPLIER: f64 = 0.5;
pub const MAX_FRAME_MULTIPLIER: f64 = 2.0;

/// Elapsed time for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDelta {
    /// Unclamped delta since the previous tick.
    pub raw_ms: f64,
    /// `raw_ms / NOMINAL_FRAME_MS`, clamped to [0.5, 2].
    pub multiplier: f32,
    /// The clamped delta, `multiplier × NOMINAL_FRAME_MS`.
    pub frame_ms: f32,
}

/// Variable-timestep frame clock.
/// Turns display-frame timestamps into a bounded frame multiplier.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Record a frame timestamp and return the delta since the previous one.
    /// The very first frame counts as one nominal frame.
    pub fn advance(&mut self, now_ms: f64) -> FrameDelta {
        let raw_ms = match self.last_ms {
            Some(last) if now_ms.is_finite() && now_ms >= last => now_ms - last,
            _ => NOMINAL_FRAME_MS,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
        }
        let multiplier = (raw_ms / NOMINAL_FRAME_MS).clamp(MIN_FRAME_MULTIPLIER, MAX_FRAME_MULTIPLIER);
        FrameDelta {
            raw_ms,
            multiplier: multiplier as f32,
            frame_ms: (multiplier * NOMINAL_FRAME_MS) as f32,
        }
    }

    /// Forget the previous timestamp; the next frame counts as nominal.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
