//! haveibeenpwned account lookups.
//!
//! # Data Flow
//! ```text
//! account
//!     → client.rs (breachedaccount, then pasteaccount)
//!     → resilience (retry, sleep, backoff)
//!     → types.rs (Breach / Paste, sorted most recent first)
//!     → Leaks
//! ```

pub mod client;
pub mod types;

pub use client::{HibpClient, Resource};
pub use types::{Breach, HibpError, HibpResult, Leaks, Paste};
