//! Client events and the observer they are reported to.

use std::time::Duration;

use crate::hibp::HibpError;
use crate::observability::metrics;

/// Something the breach client did or saw.
#[derive(Debug)]
pub enum ClientEvent<'a> {
    /// About to wait before the next request.
    Sleeping { delay: Duration },
    /// About to send a request.
    Requesting { url: &'a str, attempt: u32 },
    /// The request failed in a retryable way.
    AttemptFailed {
        url: &'a str,
        error: &'a HibpError,
        next_delay: Duration,
    },
    /// 404: no records for this account.
    NotFound { url: &'a str },
    /// 200 and the body decoded.
    Succeeded { url: &'a str, bytes: usize },
    /// 200 but the body did not decode. Not retried.
    DecodeFailed { url: &'a str, error: &'a HibpError },
    /// Every attempt failed.
    RetriesExhausted { url: &'a str, max_retries: u32 },
}

/// Receives client events, in order, from a single lookup flow.
pub trait EventObserver: Send + Sync {
    fn on_event(&self, event: &ClientEvent<'_>);
}

/// Default observer: tracing events plus metrics counters.
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver {
    metrics_enabled: bool,
}

impl TracingObserver {
    pub fn new(metrics_enabled: bool) -> Self {
        Self { metrics_enabled }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl EventObserver for TracingObserver {
    fn on_event(&self, event: &ClientEvent<'_>) {
        match event {
            ClientEvent::Sleeping { delay } => {
                tracing::debug!(delay = ?delay, "Sleeping before next request");
                if self.metrics_enabled {
                    metrics::record_backoff(*delay);
                }
            }
            ClientEvent::Requesting { url, attempt } => {
                tracing::info!(url = %url, attempt = attempt, "Requesting");
            }
            ClientEvent::AttemptFailed {
                url,
                error,
                next_delay,
            } => {
                tracing::warn!(
                    url = %url,
                    error = %error,
                    next_delay = ?next_delay,
                    "Request failed, will retry"
                );
                if self.metrics_enabled {
                    let outcome = match error {
                        HibpError::RateLimited { .. } => "throttled",
                        _ => "network",
                    };
                    metrics::record_request(outcome);
                }
            }
            ClientEvent::NotFound { url } => {
                tracing::debug!(url = %url, "No records for account");
                if self.metrics_enabled {
                    metrics::record_request("not_found");
                }
            }
            ClientEvent::Succeeded { url, bytes } => {
                tracing::debug!(url = %url, bytes = bytes, "Response received");
                if self.metrics_enabled {
                    metrics::record_request("ok");
                }
            }
            ClientEvent::DecodeFailed { url, error } => {
                tracing::error!(url = %url, error = %error, "Undecodable response");
                if self.metrics_enabled {
                    metrics::record_request("decode_error");
                }
            }
            ClientEvent::RetriesExhausted { url, max_retries } => {
                tracing::error!(url = %url, max_retries = max_retries, "Giving up");
                if self.metrics_enabled {
                    metrics::record_retries_exhausted();
                }
            }
        }
    }
}
