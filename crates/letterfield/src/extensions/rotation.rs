// extensions/rotation.rs
//
// Scheduled word rotation, driven by frame timestamps instead of timers so
// teardown is just dropping the schedule.

/// Cycles through a list of words at a fixed interval.
#[derive(Debug, Clone)]
pub struct WordRotation {
    words: Vec<String>,
    interval_ms: f64,
    index: usize,
    next_due_ms: Option<f64>,
}

impl WordRotation {
    /// Build a rotation. Blank words are dropped; the interval is floored at one frame.
    pub fn new<I, S>(words: I, interval_ms: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words
            .into_iter()
            .map(Into::into)
            .filter(|w: &String| !w.trim().is_empty())
            .collect();
        let interval_ms = if interval_ms.is_finite() {
            interval_ms.max(crate::core::time::NOMINAL_FRAME_MS)
        } else {
            crate::core::time::NOMINAL_FRAME_MS
        };
        Self {
            words,
            interval_ms,
            index: 0,
            next_due_ms: None,
        }
    }

    /// The word currently shown.
    pub fn current(&self) -> Option<&str> {
        self.words.get(self.index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Advance the schedule. Returns the next word when its slot is due.
    ///
    /// The first call only arms the schedule.
    pub fn poll(&mut self, now_ms: f64) -> Option<&str> {
        if self.words.len() < 2 {
            return None;
        }
        let due = *self.next_due_ms.get_or_insert(now_ms + self.interval_ms);
        if now_ms < due {
            return None;
        }
        self.index = (self.index + 1) % self.words.len();
        self.next_due_ms = Some(now_ms + self.interval_ms);
        self.current()
    }

    /// Restart the interval at `now_ms` without advancing, e.g. after a manual word change.
    pub fn rearm(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.interval_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_poll_arms_without_rotating() {
        let mut rot = WordRotation::new(["build", "ship"], 1000.0);
        assert_eq!(rot.poll(0.0), None);
        assert_eq!(rot.current(), Some("build"));
    }

    #[test]
    fn rotates_when_due_and_wraps() {
        let mut rot = WordRotation::new(["a", "b", "c"], 1000.0);
        rot.poll(0.0);
        assert_eq!(rot.poll(999.0), None);
        assert_eq!(rot.poll(1000.0), Some("b"));
        assert_eq!(rot.poll(1500.0), None);
        assert_eq!(rot.poll(2000.0), Some("c"));
        assert_eq!(rot.poll(3000.0), Some("a"));
    }

    #[test]
    fn single_word_never_rotates() {
        let mut rot = WordRotation::new(["solo"], 10.0);
        assert_eq!(rot.poll(0.0), None);
        assert_eq!(rot.poll(1e6), None);
    }

    #[test]
    fn blank_words_are_dropped() {
        let rot = WordRotation::new(["", "  ", "ok"], 100.0);
        assert_eq!(rot.len(), 1);
    }

    #[test]
    fn rearm_restarts_interval() {
        let mut rot = WordRotation::new(["a", "b"], 1000.0);
        rot.poll(0.0);
        rot.rearm(900.0);
        assert_eq!(rot.poll(1000.0), None);
        assert_eq!(rot.poll(1899.0), None);
        assert_eq!(rot.poll(1900.0), Some("b"));
        assert_eq!(rot.current(), Some("b"));
    }
}
