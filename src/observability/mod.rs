//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HibpClient produces ClientEvents:
//!     → events.rs (EventObserver, default TracingObserver)
//!     → logging.rs (tracing subscriber on stderr)
//!     → metrics.rs (counters, when a recorder is installed)
//! ```

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{ClientEvent, EventObserver, TracingObserver};
