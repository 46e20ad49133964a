use crate::api::types::{Phase, StartMode};

/// Drop → morph state machine with its two clocks.
///
/// The run clock starts on the first tick of a run and decides when the drop
/// ends. The morph clock starts on the first tick spent in morph and restarts
/// whenever morph is forced again by a retarget.
#[derive(Debug, Clone)]
pub struct PhaseClock {
    phase: Phase,
    run_origin_ms: Option<f64>,
    morph_origin_ms: Option<f64>,
    elapsed_ms: f64,
    morph_ms: f64,
}

impl PhaseClock {
    pub fn new(start: StartMode) -> Self {
        Self {
            phase: initial_phase(start),
            run_origin_ms: None,
            morph_origin_ms: None,
            elapsed_ms: 0.0,
            morph_ms: 0.0,
        }
    }

    /// Begin a new run. Both clocks restart on the next `advance`.
    pub fn restart(&mut self, start: StartMode) {
        *self = Self::new(start);
    }

    /// Enter morph now; the morph clock reads 0 on the next `advance`.
    pub fn force_morph(&mut self) {
        self.phase = Phase::Morph;
        self.morph_origin_ms = None;
        self.morph_ms = 0.0;
    }

    /// Move both clocks to `now_ms` and apply the automatic drop → morph transition.
    pub fn advance(&mut self, now_ms: f64, drop_window_ms: f64) -> Phase {
        let run_origin = *self.run_origin_ms.get_or_insert(now_ms);
        self.elapsed_ms = (now_ms - run_origin).max(0.0);

        if self.phase == Phase::Drop && self.elapsed_ms >= drop_window_ms {
            self.phase = Phase::Morph;
            self.morph_origin_ms = None;
        }

        match self.phase {
            Phase::Drop => self.morph_ms = 0.0,
            Phase::Morph => {
                let morph_origin = *self.morph_origin_ms.get_or_insert(now_ms);
                self.morph_ms = (now_ms - morph_origin).max(0.0);
            }
        }
        self.phase
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Time since the run started, as of the last `advance`.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Time since morph was (re)entered, as of the last `advance`.
    pub fn morph_ms(&self) -> f64 {
        self.morph_ms
    }
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self::new(StartMode::Drop)
    }
}

fn initial_phase(start: StartMode) -> Phase {
    match start {
        StartMode::Drop => Phase::Drop,
        StartMode::Continuity => Phase::Morph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: f64 = 1200.0 + 900.0;

    #[test]
    fn drop_until_window_elapses() {
        let mut clock = PhaseClock::new(StartMode::Drop);
        let start = 10_000.0;
        assert_eq!(clock.advance(start, WINDOW), Phase::Drop);
        for elapsed in [1.0, 500.0, 2000.0, 2099.0, 2099.99] {
            assert_eq!(clock.advance(start + elapsed, WINDOW), Phase::Drop, "elapsed {}", elapsed);
            assert_eq!(clock.morph_ms(), 0.0);
        }
        assert_eq!(clock.advance(start + 2100.0, WINDOW), Phase::Morph);
        assert_eq!(clock.morph_ms(), 0.0);
        assert_eq!(clock.advance(start + 2200.0, WINDOW), Phase::Morph);
        assert_eq!(clock.morph_ms(), 100.0);
    }

    #[test]
    fn continuity_starts_in_morph() {
        let mut clock = PhaseClock::new(StartMode::Continuity);
        assert_eq!(clock.advance(42.0, WINDOW), Phase::Morph);
        assert_eq!(clock.morph_ms(), 0.0);
    }

    #[test]
    fn force_morph_restarts_morph_clock() {
        let mut clock = PhaseClock::new(StartMode::Continuity);
        clock.advance(0.0, WINDOW);
        clock.advance(5000.0, WINDOW);
        assert_eq!(clock.morph_ms(), 5000.0);

        clock.force_morph();
        clock.advance(5016.0, WINDOW);
        assert_eq!(clock.morph_ms(), 0.0);
        clock.advance(5116.0, WINDOW);
        assert_eq!(clock.morph_ms(), 100.0);
        assert_eq!(clock.elapsed_ms(), 5116.0);
    }

    #[test]
    fn force_morph_during_drop_skips_remaining_drop() {
        let mut clock = PhaseClock::new(StartMode::Drop);
        clock.advance(0.0, WINDOW);
        clock.force_morph();
        assert_eq!(clock.advance(100.0, WINDOW), Phase::Morph);
        assert_eq!(clock.morph_ms(), 0.0);
    }
}
