//! Configuration validation.
//!
//! Serde handles syntax; this checks values. All problems are returned, not
//! just the first.

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;
use crate::observability::logging::LOG_LEVELS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("client.base_url '{url}' is not a valid URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("client.base_url '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("client.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("client.user_agent must not be empty")]
    EmptyUserAgent,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.client.base_url) {
        Ok(url) if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") => {
            errors.push(ValidationError::UnsupportedScheme(config.client.base_url.clone()));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: config.client.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.client.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.client.user_agent.trim().is_empty() {
        errors.push(ValidationError::EmptyUserAgent);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
