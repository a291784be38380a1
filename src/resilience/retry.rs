//! Retry policy
//!
//! Re-issues a request after network-level failures only. The server's
//! answers (envelope errors, HTTP statuses, undecodable bodies) are final.

use crate::Error;
use std::time::Duration;

/// Upper bound for a single backoff sleep.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Configuration for retry logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Re-issues after the first attempt; `0` disables retrying.
    pub max_retries: u32,
    /// First backoff; `0` re-issues immediately.
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl RetryConfig {
    pub fn new(max_retries: u32, min_delay: Duration) -> Self {
        Self {
            max_retries,
            min_delay,
            max_delay: MAX_BACKOFF.max(min_delay),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    /// Exponential backoff: min_delay * 2^attempt, capped at max_delay
    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.config.min_delay.as_millis() as u64;
        let cap = self.config.max_delay.as_millis() as u64;
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(base.saturating_mul(factor).min(cap))
    }

    /// Decide whether to re-issue after a failed attempt.
    ///
    /// `attempt` is 0-based (first failure => attempt=0). Returns the delay to
    /// wait before the next attempt, or `None` to give up.
    pub fn should_retry(&self, attempt: u32, error: &Error) -> Option<Duration> {
        if attempt >= self.config.max_retries || !error.is_transient() {
            return None;
        }
        Some(self.backoff(attempt))
    }
}
