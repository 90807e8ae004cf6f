//! Bounded retry with a fixed delay between attempts.

use log::warn;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Never less than 1.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Defaults overridden by `INVOICE_API_MAX_ATTEMPTS` and `INVOICE_API_RETRY_DELAY_MS`
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("INVOICE_API_MAX_ATTEMPTS").ok().as_deref(),
            std::env::var("INVOICE_API_RETRY_DELAY_MS").ok().as_deref(),
        )
    }

    fn from_values(max_attempts: Option<&str>, delay_ms: Option<&str>) -> Self {
        let defaults = Self::default();
        let max_attempts = max_attempts
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(defaults.max_attempts);
        let delay = delay_ms
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.delay);
        Self::new(max_attempts, delay)
    }
}

/// The last error seen and how many attempts were made
#[derive(Debug)]
pub struct RetryFailure<E> {
    pub error: E,
    pub attempts: u32,
}

/// Run `operation` until it succeeds, fails with an error `is_transient`
/// rejects, or the policy runs out of attempts.
pub fn run_with_retry<T, E, F, P>(policy: &RetryPolicy, mut operation: F, is_transient: P) -> Result<T, RetryFailure<E>>
where
    F: FnMut() -> Result<T, E>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(error) if is_transient(&error) && attempt < max_attempts => {
                warn!("Attempt {}/{} failed: {}. Retrying in {:?}", attempt, max_attempts, error, policy.delay);
                std::thread::sleep(policy.delay);
                attempt += 1;
            }
            Err(error) => return Err(RetryFailure { error, attempts: attempt }),
        }
    }
}
