//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;
use crate::resilience::RetryPolicy;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Breach API client settings.
    pub client: ClientConfig,

    /// Output settings.
    pub output: OutputConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Breach API client configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// API base URL, without the `/api/v2` prefix.
    pub base_url: String,

    /// Retries after the first attempt of each lookup.
    pub max_retries: u32,

    /// Minimum delay between two requests in milliseconds.
    pub request_delay_ms: u64,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Honor `HTTP_PROXY` / `HTTPS_PROXY` from the environment.
    pub system_proxy: bool,
}

impl ClientConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.request_delay())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://haveibeenpwned.com".to_string(),
            max_retries: 10,
            request_delay_ms: 10_000,
            timeout_secs: 10,
            user_agent: concat!("breach-scan/", env!("CARGO_PKG_VERSION")).to_string(),
            system_proxy: true,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Format written to stdout.
    pub format: OutputFormat,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record request counters through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.client.base_url, "https://haveibeenpwned.com");
        assert_eq!(config.client.max_retries, 10);
        assert_eq!(config.client.request_delay(), Duration::from_secs(10));
        assert_eq!(config.client.timeout(), Duration::from_secs(10));
        assert!(config.client.user_agent.starts_with("breach-scan/"));
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [client]
            max_retries = 3
            request_delay_ms = 1500

            [output]
            format = "jsonl"
            "#,
        )
        .unwrap();

        assert_eq!(config.client.max_retries, 3);
        assert_eq!(config.client.request_delay(), Duration::from_millis(1500));
        assert_eq!(config.client.timeout_secs, 10);
        assert_eq!(config.output.format, OutputFormat::JsonLines);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_retry_policy() {
        let client = ClientConfig {
            max_retries: 2,
            request_delay_ms: 250,
            ..ClientConfig::default()
        };
        let policy = client.retry_policy();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.request_delay, Duration::from_millis(250));
    }
}
