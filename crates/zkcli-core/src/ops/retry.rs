use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry policy for version-upgrading writes
///
/// The default retries without limit and without sleeping, so the write
/// wins as soon as no other writer lands between its read and its write.
/// A cap turns persistent contention into `RetriesExhausted`; a backoff
/// doubles from `initial_backoff_ms` up to `max_backoff_ms` between
/// conflicting attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total write attempts allowed; `None` is unbounded
    pub max_attempts: Option<u32>,
    /// First sleep after a conflict; 0 disables backoff
    pub initial_backoff_ms: u64,
    /// Ceiling for the doubled sleep
    pub max_backoff_ms: u64,
}

impl RetryPolicy {
    /// Retry until success or a non-conflict error, never sleeping
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Cap the total number of write attempts (at least one)
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts.max(1));
        self
    }

    /// Sleep between conflicting attempts, doubling up to `max_ms`
    pub fn with_backoff(mut self, initial_ms: u64, max_ms: u64) -> Self {
        self.initial_backoff_ms = initial_ms;
        self.max_backoff_ms = max_ms.max(initial_ms);
        self
    }

    /// Whether another attempt may follow attempt number `attempt` (1-based)
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }

    /// Fresh backoff schedule for one operation
    pub fn backoff(&self) -> Backoff {
        Backoff {
            next_ms: self.initial_backoff_ms,
            max_ms: self.max_backoff_ms.max(self.initial_backoff_ms),
        }
    }
}

/// Exponential backoff schedule
#[derive(Debug, Clone)]
pub struct Backoff {
    next_ms: u64,
    max_ms: u64,
}

impl Backoff {
    /// Sleep to take now, or `None` when backoff is disabled
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.next_ms == 0 {
            return None;
        }
        let (sleep_ms, next_ms) = compute_backoff(self.next_ms, self.max_ms);
        self.next_ms = next_ms;
        Some(Duration::from_millis(sleep_ms))
    }
}

/// Current sleep and the doubled next value, capped at `max_backoff_ms`
pub fn compute_backoff(current_backoff_ms: u64, max_backoff_ms: u64) -> (u64, u64) {
    let sleep_ms = current_backoff_ms.min(max_backoff_ms);
    let next_backoff_ms = current_backoff_ms.saturating_mul(2).min(max_backoff_ms);
    (sleep_ms, next_backoff_ms)
}
