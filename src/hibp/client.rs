//! Breach API client with rate-limit aware retries.
//!
//! # Responsibilities
//! - Build per-account resource URLs
//! - Run each lookup through the retry state machine
//! - Decode and sort breach and paste records
//! - Carry the pending inter-request delay from one lookup to the next

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::hibp::types::{sort_breaches, sort_pastes, Breach, HibpError, HibpResult, Leaks, Paste};
use crate::observability::{ClientEvent, EventObserver, TracingObserver};
use crate::resilience::backoff::{parse_retry_after, RetryPolicy};
use crate::resilience::{AttemptOutcome, RetryMachine, RetryState, Sleeper, TokioSleeper};

/// Per-account API resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Breaches,
    Pastes,
}

impl Resource {
    fn segment(self) -> &'static str {
        match self {
            Resource::Breaches => "breachedaccount",
            Resource::Pastes => "pasteaccount",
        }
    }
}

/// Client for the haveibeenpwned v2 account endpoints.
///
/// Lookups take `&mut self`: the client owns the delay scheduled by the last
/// response and applies it before the next request.
pub struct HibpClient<S = TokioSleeper> {
    http: reqwest::Client,
    base_url: Url,
    policy: RetryPolicy,
    next_sleep: Duration,
    sleeper: S,
    observer: Arc<dyn EventObserver>,
}

impl HibpClient<TokioSleeper> {
    /// Create a client that sleeps in real time and logs through tracing.
    pub fn new(config: &ClientConfig) -> HibpResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| HibpError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(HibpError::InvalidUrl(config.base_url.clone()));
        }

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str());
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build().map_err(HibpError::ClientBuild)?;

        Ok(Self {
            http,
            base_url,
            policy: config.retry_policy(),
            next_sleep: Duration::ZERO,
            sleeper: TokioSleeper,
            observer: Arc::new(TracingObserver::default()),
        })
    }
}

impl<S: Sleeper> HibpClient<S> {
    /// Swap the sleeper, keeping configuration and pending delay.
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> HibpClient<T> {
        HibpClient {
            http: self.http,
            base_url: self.base_url,
            policy: self.policy,
            next_sleep: self.next_sleep,
            sleeper,
            observer: self.observer,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn EventObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Delay that will be applied before the next request.
    pub fn next_sleep(&self) -> Duration {
        self.next_sleep
    }

    /// `{base}/api/v2/{resource}/{account}` with the account percent-encoded
    /// as a single path segment.
    pub fn resource_url(&self, resource: Resource, account: &str) -> HibpResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| HibpError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "v2", resource.segment(), account]);
        Ok(url)
    }

    /// Breaches for `account`, most recent first. Empty if the API has none.
    pub async fn fetch_breaches(&mut self, account: &str) -> HibpResult<Vec<Breach>> {
        let mut breaches: Vec<Breach> = self
            .get_json(Resource::Breaches, account)
            .await?
            .unwrap_or_default();
        sort_breaches(&mut breaches);
        Ok(breaches)
    }

    /// Pastes for `account`, most recent first. Empty if the API has none.
    pub async fn fetch_pastes(&mut self, account: &str) -> HibpResult<Vec<Paste>> {
        let mut pastes: Vec<Paste> = self
            .get_json(Resource::Pastes, account)
            .await?
            .unwrap_or_default();
        sort_pastes(&mut pastes);
        Ok(pastes)
    }

    /// Breaches, then pastes. Fails as soon as either lookup fails.
    pub async fn fetch_leaks(&mut self, account: &str) -> HibpResult<Leaks> {
        let breaches = self.fetch_breaches(account).await?;
        let pastes = self.fetch_pastes(account).await?;
        Ok(Leaks { breaches, pastes })
    }

    /// GET a resource until it resolves. `None` means 404.
    async fn get_json<T: DeserializeOwned>(
        &mut self,
        resource: Resource,
        account: &str,
    ) -> HibpResult<Option<T>> {
        let url = self.resource_url(resource, account)?;
        let mut machine = RetryMachine::new(self.policy, self.next_sleep);
        let mut body = None;

        while !machine.state().is_terminal() {
            match machine.state() {
                RetryState::Idle => {
                    machine.start_attempt();
                }
                RetryState::Sleeping(delay) => {
                    self.observer.on_event(&ClientEvent::Sleeping { delay });
                    self.sleeper.sleep(delay).await;
                    machine.wake();
                }
                RetryState::Requesting { attempt } => {
                    self.observer.on_event(&ClientEvent::Requesting {
                        url: url.as_str(),
                        attempt,
                    });

                    let (outcome, failure) = match self.http.get(url.clone()).send().await {
                        Err(e) => (AttemptOutcome::Transport, Some(HibpError::Network(e))),
                        Ok(response) => match response.status() {
                            StatusCode::NOT_FOUND => (AttemptOutcome::NotFound, None),
                            StatusCode::OK => match response.bytes().await {
                                Ok(bytes) => {
                                    body = Some(bytes);
                                    (AttemptOutcome::Success, None)
                                }
                                Err(e) => {
                                    (AttemptOutcome::BodyUnreadable, Some(HibpError::Network(e)))
                                }
                            },
                            status => {
                                let retry_after = parse_retry_after(response.headers());
                                (
                                    AttemptOutcome::Throttled { retry_after },
                                    Some(HibpError::RateLimited {
                                        status: status.as_u16(),
                                        retry_after,
                                    }),
                                )
                            }
                        },
                    };

                    machine.record(outcome);
                    if let Some(error) = failure {
                        self.observer.on_event(&ClientEvent::AttemptFailed {
                            url: url.as_str(),
                            error: &error,
                            next_delay: machine.pending_sleep(),
                        });
                    }
                }
                RetryState::Succeeded | RetryState::NotFound | RetryState::Failed => {}
            }
        }

        self.next_sleep = machine.pending_sleep();

        match machine.state() {
            RetryState::Succeeded => {
                let body = body.as_deref().unwrap_or_default();
                match serde_json::from_slice(body) {
                    Ok(decoded) => {
                        self.observer.on_event(&ClientEvent::Succeeded {
                            url: url.as_str(),
                            bytes: body.len(),
                        });
                        Ok(Some(decoded))
                    }
                    Err(source) => {
                        let error = HibpError::Decode {
                            url: url.to_string(),
                            source,
                        };
                        self.observer.on_event(&ClientEvent::DecodeFailed {
                            url: url.as_str(),
                            error: &error,
                        });
                        Err(error)
                    }
                }
            }
            RetryState::NotFound => {
                self.observer
                    .on_event(&ClientEvent::NotFound { url: url.as_str() });
                Ok(None)
            }
            _ => {
                self.observer.on_event(&ClientEvent::RetriesExhausted {
                    url: url.as_str(),
                    max_retries: self.policy.max_retries,
                });
                Err(HibpError::MaxRetriesExceeded {
                    url: url.to_string(),
                    max_retries: self.policy.max_retries,
                })
            }
        }
    }
}
