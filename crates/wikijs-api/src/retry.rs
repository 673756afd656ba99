// Retry policy for the HTTP transport.
//
// Network failures and 5xx answers are retried with an exponential wait
// clamped between `min_wait` and `max_wait`. 4xx answers never are.

use std::time::Duration;

/// Bounded retry configuration applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, the first one included. Zero is treated as one.
    pub max_attempts: u32,
    /// Wait before the first retry; also the lower bound for every wait.
    pub min_wait: Duration,
    /// Upper bound for every wait.
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_wait: Duration::from_secs(1),
            max_wait: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Retry up to `max_attempts` times without sleeping in between.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            min_wait: Duration::ZERO,
            max_wait: Duration::ZERO,
        }
    }

    /// Never retry.
    pub fn none() -> Self {
        Self::immediate(1)
    }

    /// Effective number of attempts.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Wait before retry number `retry` (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        let delay = self.min_wait.saturating_mul(1_u32 << exponent);
        delay.clamp(self.min_wait, self.max_wait.max(self.min_wait))
    }
}
