//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use breach_scan::config::ClientConfig;
use breach_scan::observability::{ClientEvent, EventObserver};
use breach_scan::resilience::Sleeper;
use breach_scan::{HibpClient, HibpError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

pub const TEST_ACCOUNT: &str = "troyhunt@gmail.com";
pub const BREACHES_FIXTURE: &str = include_str!("../fixtures/breaches.json");
#[allow(dead_code)]
pub const PASTES_FIXTURE: &str = include_str!("../fixtures/pastes.json");

/// A canned HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    /// Advertise a longer body than is sent, so the client fails mid-read.
    pub truncated: bool,
}

#[allow(dead_code)]
impl MockResponse {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
            truncated: false,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
            truncated: false,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// The handler receives the raw request path, e.g.
/// `/api/v2/breachedaccount/troyhunt@gmail.com`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MockResponse> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let (reader, mut writer) = socket.split();
                        let mut reader = BufReader::new(reader);

                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.is_err() {
                            return;
                        }
                        let path = request_line
                            .split_whitespace()
                            .nth(1)
                            .unwrap_or("/")
                            .to_string();

                        loop {
                            let mut line = String::new();
                            match reader.read_line(&mut line).await {
                                Ok(0) | Err(_) => break,
                                Ok(_) if line.trim().is_empty() => break,
                                Ok(_) => {}
                            }
                        }

                        let response = f(path).await;
                        let content_length = if response.truncated {
                            response.body.len() + 64
                        } else {
                            response.body.len()
                        };

                        let mut raw = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                            response.status,
                            reason(response.status),
                            content_length
                        );
                        for (name, value) in &response.headers {
                            raw.push_str(&format!("{}: {}\r\n", name, value));
                        }
                        raw.push_str("\r\n");
                        raw.push_str(&response.body);

                        let _ = writer.write_all(raw.as_bytes()).await;
                        let _ = writer.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock backend serving fixed bodies by path; other paths get 404.
/// Every requested path is appended to the returned log.
#[allow(dead_code)]
pub async fn start_mock_backend(
    routes: HashMap<String, MockResponse>,
) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let routes = Arc::new(routes);
    let requests = log.clone();

    let addr = start_programmable_backend(move |path| {
        let routes = routes.clone();
        let requests = requests.clone();
        async move {
            requests.lock().unwrap().push(path.clone());
            routes
                .get(&path)
                .cloned()
                .unwrap_or_else(|| MockResponse::status(404))
        }
    })
    .await;

    (addr, log)
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[allow(dead_code)]
pub fn breaches_path(account: &str) -> String {
    format!("/api/v2/breachedaccount/{}", account)
}

#[allow(dead_code)]
pub fn pastes_path(account: &str) -> String {
    format!("/api/v2/pasteaccount/{}", account)
}

/// Records requested sleeps instead of waiting.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

#[allow(dead_code)]
impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Owned summary of a `ClientEvent`.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seen {
    Sleeping(Duration),
    Requesting(u32),
    /// `status` is set for rate-limited attempts, `None` for transport faults.
    AttemptFailed {
        status: Option<u16>,
        next_delay: Duration,
    },
    NotFound,
    Succeeded,
    DecodeFailed,
    RetriesExhausted(u32),
}

/// Records every client event in order.
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    seen: Arc<Mutex<Vec<Seen>>>,
}

#[allow(dead_code)]
impl RecordingObserver {
    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

impl EventObserver for RecordingObserver {
    fn on_event(&self, event: &ClientEvent<'_>) {
        let seen = match event {
            ClientEvent::Sleeping { delay } => Seen::Sleeping(*delay),
            ClientEvent::Requesting { attempt, .. } => Seen::Requesting(*attempt),
            ClientEvent::AttemptFailed {
                error, next_delay, ..
            } => Seen::AttemptFailed {
                status: match error {
                    HibpError::RateLimited { status, .. } => Some(*status),
                    _ => None,
                },
                next_delay: *next_delay,
            },
            ClientEvent::NotFound { .. } => Seen::NotFound,
            ClientEvent::Succeeded { .. } => Seen::Succeeded,
            ClientEvent::DecodeFailed { .. } => Seen::DecodeFailed,
            ClientEvent::RetriesExhausted { max_retries, .. } => {
                Seen::RetriesExhausted(*max_retries)
            }
        };
        self.seen.lock().unwrap().push(seen);
    }
}

/// Client pointed at `addr` that records sleeps instead of waiting.
pub fn test_client(
    addr: SocketAddr,
    max_retries: u32,
    request_delay: Duration,
) -> (HibpClient<RecordingSleeper>, RecordingSleeper) {
    let config = ClientConfig {
        base_url: format!("http://{}", addr),
        max_retries,
        request_delay_ms: request_delay.as_millis() as u64,
        timeout_secs: 5,
        system_proxy: false,
        ..ClientConfig::default()
    };
    let sleeper = RecordingSleeper::default();
    let client = HibpClient::new(&config)
        .unwrap()
        .with_sleeper(sleeper.clone());
    (client, sleeper)
}
