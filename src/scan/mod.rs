//! Batch processing of account lists.
//!
//! # Data Flow
//! ```text
//! input (file or single --account)
//!     → accounts.rs (trim, skip blank lines)
//!     → runner.rs (one account at a time, in input order)
//!         → HibpClient::fetch_leaks
//!         → OutputFormat::render → stdout
//!         → JSON line → detail file (optional)
//! ```
//!
//! The first failed lookup stops the run.

pub mod accounts;
pub mod runner;

pub use accounts::{normalize_account, Accounts};
pub use runner::{scan_accounts, ScanError, ScanSummary};
