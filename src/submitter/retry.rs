use rand::Rng;
use std::time::Duration;

/// How many times a record is tried and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Cap for later retries.
    pub max_delay: Duration,
    /// Jitter ratio (0.0..=1.0) applied to delay.
    pub jitter_ratio: f64,
}

impl RetryPolicy {
    /// Three attempts, two seconds apart, growing a little each time.
    pub fn form_default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(8),
            jitter_ratio: 0.2,
        }
    }

    /// No waiting at all.
    #[cfg(test)]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter_ratio: 0.0,
        }
    }

    /// Attempts actually made; a zero budget still gets one try.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Wait after the `failed_attempt`-th try of a record: `base_delay`,
    /// doubled for every further failure, never above `max_delay`.
    pub fn backoff_delay(&self, failed_attempt: u32) -> Duration {
        let doublings = failed_attempt.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << doublings)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }

    /// Spreads the wait by up to `jitter_ratio` either way, so a form that
    /// throttles us does not see the records arrive on a fixed beat.
    pub fn with_jitter(&self, wait: Duration) -> Duration {
        let ratio = self.jitter_ratio.clamp(0.0, 1.0);
        if ratio == 0.0 || wait.is_zero() {
            return wait;
        }
        let ms = wait.as_millis() as f64;
        let jittered = rand::thread_rng().gen_range(ms * (1.0 - ratio)..=ms * (1.0 + ratio));
        Duration::from_millis(jittered.round() as u64)
    }

    pub fn delay_before_retry(&self, retry_index: u32) -> Duration {
        self.with_jitter(self.backoff_delay(retry_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            jitter_ratio: 0.0,
        };
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(400));
        assert_eq!(policy.backoff_delay(4), Duration::from_millis(500));
    }

    #[test]
    fn jitter_stays_within_ratio() {
        let policy = RetryPolicy::form_default();
        for _ in 0..50 {
            let d = policy.delay_before_retry(1);
            assert!(d >= Duration::from_millis(1600) && d <= Duration::from_millis(2400));
        }
    }

    #[test]
    fn zero_budget_still_tries_once() {
        assert_eq!(RetryPolicy::immediate(0).attempts(), 1);
        assert_eq!(RetryPolicy::immediate(3).attempts(), 3);
    }
}
