//! Retry state machine for breach API lookups.
//!
//! # States
//! - Idle: between attempts, a delay may be pending
//! - Sleeping: waiting out the pending delay
//! - Requesting: one GET is in flight
//! - Succeeded / NotFound / Failed: terminal
//!
//! # State Transitions
//! ```text
//! Idle → Failed: attempts > max_retries
//! Idle → Sleeping: pending delay > 0
//! Idle → Requesting: pending delay == 0
//! Sleeping → Requesting: woke
//! Requesting → Succeeded: 200 with a readable body
//! Requesting → NotFound: 404
//! Requesting → Idle: transport error, unreadable body, any other status
//! ```
//!
//! Every recorded outcome resets the pending delay to the policy's request
//! delay, except a throttled response carrying `Retry-After`.

use std::time::Duration;

use crate::resilience::backoff::RetryPolicy;

/// Current position of a lookup in its retry sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Idle,
    Sleeping(Duration),
    Requesting { attempt: u32 },
    Succeeded,
    NotFound,
    Failed,
}

impl RetryState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RetryState::Succeeded | RetryState::NotFound | RetryState::Failed
        )
    }
}

/// What a single GET produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 200 and the body was read in full.
    Success,
    /// 404: the account is not in this dataset.
    NotFound,
    /// Any other status, with the parsed `Retry-After` seconds if present.
    Throttled { retry_after: Option<u64> },
    /// Connection, DNS or timeout failure.
    Transport,
    /// 200 but reading the body failed midway.
    BodyUnreadable,
}

/// Drives one lookup through the retry states.
///
/// The pending delay is seeded from the client and handed back once the
/// machine reaches a terminal state, so the delay outlives a single lookup.
#[derive(Debug, Clone)]
pub struct RetryMachine {
    policy: RetryPolicy,
    state: RetryState,
    attempts: u32,
    pending_sleep: Duration,
}

impl RetryMachine {
    pub fn new(policy: RetryPolicy, pending_sleep: Duration) -> Self {
        Self {
            policy,
            state: RetryState::Idle,
            attempts: 0,
            pending_sleep,
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    /// Number of attempts whose outcome has been recorded.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay to apply before the next request.
    pub fn pending_sleep(&self) -> Duration {
        self.pending_sleep
    }

    /// Leave `Idle`: give up, sleep, or send right away.
    pub fn start_attempt(&mut self) -> RetryState {
        if self.state != RetryState::Idle {
            return self.state;
        }

        self.state = if self.attempts > self.policy.max_retries {
            RetryState::Failed
        } else if !self.pending_sleep.is_zero() {
            RetryState::Sleeping(self.pending_sleep)
        } else {
            RetryState::Requesting {
                attempt: self.attempts,
            }
        };
        self.state
    }

    /// The pending delay has elapsed.
    pub fn wake(&mut self) -> RetryState {
        if let RetryState::Sleeping(_) = self.state {
            self.pending_sleep = Duration::ZERO;
            self.state = RetryState::Requesting {
                attempt: self.attempts,
            };
        }
        self.state
    }

    /// Record the result of the in-flight request.
    pub fn record(&mut self, outcome: AttemptOutcome) -> RetryState {
        if !matches!(self.state, RetryState::Requesting { .. }) {
            return self.state;
        }

        self.attempts += 1;
        self.pending_sleep = self.policy.request_delay;

        self.state = match outcome {
            AttemptOutcome::Success => RetryState::Succeeded,
            AttemptOutcome::NotFound => RetryState::NotFound,
            AttemptOutcome::Throttled { retry_after } => {
                self.pending_sleep = self.policy.throttle_delay(retry_after);
                RetryState::Idle
            }
            AttemptOutcome::Transport | AttemptOutcome::BodyUnreadable => RetryState::Idle,
        };
        self.state
    }
}
