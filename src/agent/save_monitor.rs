//! Edge detector for the host's saved flag.

/// Tracks the last observed saved state.
///
/// Fires only on a `false → true` transition. The first observation and
/// repeated `true` readings never fire.
#[derive(Debug, Default)]
pub struct SaveMonitor {
    last: Option<bool>,
}

impl SaveMonitor {
    /// Creates a monitor with no prior observation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `saved` and returns `true` if a `saved` event should be
    /// emitted.
    pub fn observe(&mut self, saved: bool) -> bool {
        let fired = self.last == Some(false) && saved;
        self.last = Some(saved);
        fired
    }

    /// Forgets the last observation (used when the host cannot be read).
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fired(sequence: &[bool]) -> usize {
        let mut monitor = SaveMonitor::new();
        sequence.iter().filter(|&&s| monitor.observe(s)).count()
    }

    #[test]
    fn dirty_then_saved_fires_once() {
        assert_eq!(fired(&[false, true]), 1);
        assert_eq!(fired(&[false, true, true, true]), 1);
    }

    #[test]
    fn initial_and_steady_states_are_silent() {
        assert_eq!(fired(&[true]), 0);
        assert_eq!(fired(&[true, true]), 0);
        assert_eq!(fired(&[false, false]), 0);
    }

    #[test]
    fn every_save_cycle_fires() {
        assert_eq!(fired(&[true, false, true, false, false, true]), 2);
    }

    #[test]
    fn reset_swallows_next_edge() {
        let mut monitor = SaveMonitor::new();
        assert!(!monitor.observe(false));
        monitor.reset();
        assert!(!monitor.observe(true));
    }
}
