//! Sleep abstraction used between requests.

use std::time::Duration;

/// Suspends the lookup flow before the next outbound request.
///
/// The client only ever awaits one sleep at a time.
/// The returned future is not `Send`, so lookups run on the calling task
/// rather than through `tokio::spawn`.
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// Real-time sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_waits() {
        let start = Instant::now();
        TokioSleeper.sleep(Duration::from_secs(6)).await;
        assert!(start.elapsed() >= Duration::from_secs(6));
    }
}
