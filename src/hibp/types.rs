//! Breach and paste records plus error definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A disclosed dataset the account appears in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Breach {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub domain: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub breach_date: String,
    pub added_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub pwn_count: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub data_classes: Vec<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_fabricated: bool,
    #[serde(default)]
    pub is_sensitive: bool,
    #[serde(default)]
    pub is_retired: bool,
    #[serde(default)]
    pub is_spam_list: bool,
    #[serde(default)]
    pub logo_path: String,
}

impl Breach {
    /// Domain if the breach has one, title otherwise.
    pub fn display_name(&self) -> &str {
        if self.domain.is_empty() {
            &self.title
        } else {
            &self.domain
        }
    }

    /// Four digit year of the breach date, if the date is well formed.
    pub fn breach_year(&self) -> Option<&str> {
        self.breach_date.get(..4)
    }

    pub fn exposes(&self, data_class: &str) -> bool {
        self.data_classes.iter().any(|c| c == data_class)
    }
}

/// A paste-site posting mentioning the account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Paste {
    pub source: String,
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub email_count: u64,
}

/// Most recent breach first.
pub fn sort_breaches(breaches: &mut [Breach]) {
    breaches.sort_by(|a, b| b.breach_date.cmp(&a.breach_date));
}

/// Most recent paste first, undated pastes last.
pub fn sort_pastes(pastes: &mut [Paste]) {
    pastes.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Everything known about one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Leaks {
    pub breaches: Vec<Breach>,
    pub pastes: Vec<Paste>,
}

impl Leaks {
    pub fn is_empty(&self) -> bool {
        self.breaches.is_empty() && self.pastes.is_empty()
    }
}

/// Errors that can occur while talking to the breach API.
#[derive(Debug, Error)]
pub enum HibpError {
    /// Connection, DNS, timeout or body transfer failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Any non-200, non-404 response.
    #[error("rate limited with HTTP {status} (Retry-After {retry_after:?})")]
    RateLimited { status: u16, retry_after: Option<u64> },

    /// A 200 response whose body is not the expected JSON.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("max retries exceeded ({max_retries}) for {url}")]
    MaxRetriesExceeded { url: String, max_retries: u32 },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Result type for breach API operations.
pub type HibpResult<T> = Result<T, HibpError>;
