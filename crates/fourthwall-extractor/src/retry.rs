//! Attempt budget and exponential backoff for model calls

use std::time::Duration;

/// Bounded retry schedule
///
/// The delay after the `n`th failed attempt is `base * 2^(n-1)`. There is no
/// delay after the last attempt and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base: Duration,
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` is clamped to at least one
    pub fn new(max_attempts: u32, base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base,
        }
    }

    /// Total attempts allowed
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after `failures` failed attempts, or `None` if the
    /// budget is spent
    pub fn delay_after(&self, failures: u32) -> Option<Duration> {
        if failures == 0 || failures >= self.max_attempts {
            return None;
        }
        let factor = 1u32.checked_shl(failures - 1).unwrap_or(u32::MAX);
        Some(self.base.saturating_mul(factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubling_schedule() {
        let policy = RetryPolicy::new(4, Duration::from_secs(2));
        assert_eq!(policy.delay_after(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_after(2), Some(Duration::from_secs(4)));
        assert_eq!(policy.delay_after(3), Some(Duration::from_secs(8)));
    }

    #[test]
    fn test_no_delay_after_last_attempt() {
        let policy = RetryPolicy::new(4, Duration::from_secs(2));
        assert_eq!(policy.delay_after(4), None);
        assert_eq!(policy.delay_after(0), None);
    }

    #[test]
    fn test_single_attempt_never_waits() {
        let policy = RetryPolicy::new(0, Duration::from_secs(2));
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.delay_after(1), None);
    }

    #[test]
    fn test_large_failure_count_saturates() {
        let policy = RetryPolicy::new(u32::MAX, Duration::from_secs(2));
        assert!(policy.delay_after(40).is_some());
    }
}
