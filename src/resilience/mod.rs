//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to the breach API:
//!     → retries.rs (RetryMachine decides: sleep, send, or stop)
//!     → sleeper.rs (await the scheduled delay before sending)
//!     → backoff.rs (derive the next delay from the response)
//! ```
//!
//! # Behavior
//! - The first request of a session goes out immediately
//! - Every response schedules at least the configured inter-request delay
//! - A `Retry-After: N` header on a throttled response schedules N+1 seconds
//! - 404 ends the sequence with an empty result

pub mod backoff;
pub mod retries;
pub mod sleeper;

pub use backoff::RetryPolicy;
pub use retries::{AttemptOutcome, RetryMachine, RetryState};
pub use sleeper::{Sleeper, TokioSleeper};
