//! Metrics collection.
//!
//! # Metrics
//! - `breach_scan_requests_total` (counter): outbound requests by outcome
//! - `breach_scan_backoff_milliseconds_total` (counter): time spent sleeping
//! - `breach_scan_retries_exhausted_total` (counter): lookups that gave up
//!
//! Without an installed recorder these calls are no-ops.

use std::time::Duration;

pub fn record_request(outcome: &'static str) {
    metrics::counter!("breach_scan_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_backoff(delay: Duration) {
    let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
    metrics::counter!("breach_scan_backoff_milliseconds_total").increment(millis);
}

pub fn record_retries_exhausted() {
    metrics::counter!("breach_scan_retries_exhausted_total").increment(1);
}
