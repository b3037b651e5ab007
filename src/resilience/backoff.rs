//! Server-directed backoff.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Safety margin added on top of a server supplied `Retry-After`.
const RETRY_AFTER_MARGIN_SECS: u64 = 1;

/// Retry budget and default delay for a single lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay scheduled after every response without a usable `Retry-After`.
    pub request_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, request_delay: Duration) -> Self {
        Self {
            max_retries,
            request_delay,
        }
    }

    /// Delay to wait after a throttled response.
    pub fn throttle_delay(&self, retry_after: Option<u64>) -> Duration {
        match retry_after {
            Some(secs) => Duration::from_secs(secs.saturating_add(RETRY_AFTER_MARGIN_SECS)),
            None => self.request_delay,
        }
    }
}

/// Read `Retry-After` as whole seconds.
///
/// HTTP-date values are not supported and are treated as absent.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}
