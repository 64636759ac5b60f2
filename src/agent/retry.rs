//! Reconnect delay policy.

use std::time::Duration;

/// Shortest delay between reconnect attempts.
pub const MIN_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Delay schedule for reconnect attempts.
///
/// The first retry waits `initial_delay`; each following one multiplies the
/// delay by `multiplier` (clamped to at least `1.0`), capped at `max_delay`.
/// `max_attempts == 0` retries forever. Delays never drop below
/// [`MIN_RETRY_DELAY`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    initial_delay: Duration,
    multiplier: f64,
    max_delay: Duration,
    max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), 1.0, Duration::from_secs(30), 0)
    }
}

impl RetryPolicy {
    /// Builds a policy. Non-finite or sub-1 multipliers are treated as `1.0`
    /// and `initial_delay` is raised to [`MIN_RETRY_DELAY`].
    #[must_use]
    pub fn new(
        initial_delay: Duration,
        multiplier: f64,
        max_delay: Duration,
        max_attempts: u32,
    ) -> Self {
        let multiplier = if multiplier.is_finite() && multiplier >= 1.0 {
            multiplier
        } else {
            1.0
        };
        let initial_delay = initial_delay.max(MIN_RETRY_DELAY);
        Self {
            initial_delay,
            multiplier,
            max_delay: max_delay.max(initial_delay),
            max_attempts,
        }
    }

    /// Fixed delay, unlimited attempts.
    #[must_use]
    pub fn fixed(delay: Duration) -> Self {
        Self::new(delay, 1.0, delay, 0)
    }

    /// Caps the number of consecutive failed attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Delay before retry number `attempt` (1-based), or `None` once the
    /// attempt budget is spent.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if self.max_attempts != 0 && attempt > self.max_attempts {
            return None;
        }
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let delay = Duration::try_from_secs_f64(secs).unwrap_or(self.max_delay);
        Some(delay.min(self.max_delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fixed_two_seconds_forever() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_for(1_000), Some(Duration::from_secs(2)));
    }

    #[test]
    fn backoff_grows_and_caps() {
        let policy = RetryPolicy::new(Duration::from_secs(1), 2.0, Duration::from_secs(5), 0);
        assert_eq!(policy.delay_for(1), Some(Duration::from_secs(1)));
        assert_eq!(policy.delay_for(2), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_for(3), Some(Duration::from_secs(4)));
        assert_eq!(policy.delay_for(4), Some(Duration::from_secs(5)));
        assert_eq!(policy.delay_for(u32::MAX), Some(Duration::from_secs(5)));
    }

    #[test]
    fn attempts_are_bounded_when_configured() {
        let policy = RetryPolicy::fixed(Duration::from_millis(10)).with_max_attempts(2);
        assert!(policy.delay_for(2).is_some());
        assert!(policy.delay_for(3).is_none());
    }

    #[test]
    fn shrinking_multiplier_is_clamped() {
        let policy = RetryPolicy::new(Duration::from_secs(1), 0.1, Duration::from_secs(5), 0);
        assert_eq!(policy.delay_for(3), Some(Duration::from_secs(1)));
    }

    #[test]
    fn zero_delay_is_raised_to_the_floor() {
        let policy = RetryPolicy::new(Duration::ZERO, 2.0, Duration::ZERO, 0);
        assert_eq!(policy.delay_for(1), Some(MIN_RETRY_DELAY));
        assert_eq!(policy.delay_for(2), Some(MIN_RETRY_DELAY));
        assert_eq!(RetryPolicy::fixed(Duration::ZERO).delay_for(1), Some(MIN_RETRY_DELAY));
    }
}
