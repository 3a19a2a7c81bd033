//! Bounded retry with backoff.

use crate::ProviderError;
use std::time::Duration;

/// Default number of attempts, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default backoff unit.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// No retries at all.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay before retrying after `error` on zero-based `attempt`, or
    /// `None` when the error must not be retried.
    ///
    /// Rate limits wait `base * 2^attempt`; other retryable failures wait
    /// one `base` unit.
    pub fn delay_for(&self, error: &ProviderError, attempt: u32) -> Option<Duration> {
        if !error.is_retryable() {
            return None;
        }
        if error.is_rate_limit() {
            Some(self.base_delay.saturating_mul(2u32.saturating_pow(attempt)))
        } else {
            Some(self.base_delay)
        }
    }

    /// Whether `attempt` (zero-based) is the last one allowed.
    pub fn is_last(&self, attempt: u32) -> bool {
        attempt + 1 >= self.max_attempts
    }
}
