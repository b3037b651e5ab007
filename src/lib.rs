//! Breach and paste lookups against the haveibeenpwned v2 API.

pub mod config;
pub mod hibp;
pub mod observability;
pub mod output;
pub mod resilience;
pub mod scan;

pub use config::AppConfig;
pub use hibp::{HibpClient, HibpError, Leaks};
pub use output::OutputFormat;
