//! breach-scan: check accounts against haveibeenpwned.
//!
//! # Architecture Overview
//!
//! ```text
//!   accounts (file / --account)
//!        │
//!        ▼
//!   ┌─────────┐    ┌──────────────┐    ┌────────────┐
//!   │  scan   │───▶│ hibp client  │───▶│ resilience │───▶ haveibeenpwned.com
//!   │ runner  │    │ breach/paste │    │ retry/sleep│
//!   └────┬────┘    └──────────────┘    └────────────┘
//!        │
//!        ▼
//!   output (text / jsonl) → stdout, JSON lines → --output
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use breach_scan::config::{load_config, validate_config, AppConfig, ClientConfig, ConfigError};
use breach_scan::hibp::HibpClient;
use breach_scan::observability::{logging, TracingObserver};
use breach_scan::output::OutputFormat;
use breach_scan::scan::{scan_accounts, Accounts};

/// Look up breaches and pastes for one or more accounts.
#[derive(Parser, Debug)]
#[command(name = "breach-scan", version, about, long_about = None)]
struct Args {
    /// Account to search leaks for
    #[arg(short, long, conflicts_with = "filename", required_unless_present = "filename")]
    account: Option<String>,

    /// Input file of accounts to search, one account per line
    #[arg(short, long)]
    filename: Option<PathBuf>,

    /// Output file for detailed JSON-lines results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Delay between API requests, e.g. "10s" or "1500ms"; zero means the default
    #[arg(short = 'd', long, value_parser = humantime::parse_duration)]
    request_delay: Option<Duration>,

    /// Format written to stdout
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base URL (overrides config)
    #[arg(long)]
    base_url: Option<String>,

    /// Retries per request (overrides config)
    #[arg(long)]
    max_retries: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Config file (or defaults) with flag overrides applied, then validated.
    fn resolve_config(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => AppConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply(&self, config: &mut AppConfig) {
        if let Some(delay) = self.request_delay {
            config.client.request_delay_ms = if delay.is_zero() {
                ClientConfig::default().request_delay_ms
            } else {
                u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
            };
        }
        if let Some(base_url) = &self.base_url {
            config.client.base_url = base_url.clone();
        }
        if let Some(max_retries) = self.max_retries {
            config.client.max_retries = max_retries;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = args.resolve_config()?;

    logging::init_logging(
        &config.observability.log_level.to_ascii_lowercase(),
        args.verbose,
    );

    tracing::info!(
        base_url = %config.client.base_url,
        max_retries = config.client.max_retries,
        request_delay_ms = config.client.request_delay_ms,
        format = ?config.output.format,
        "Configuration loaded"
    );

    let input: Box<dyn BufRead> = match (&args.filename, &args.account) {
        (Some(path), _) => {
            let file = File::open(path)
                .map_err(|e| format!("cannot read file {}: {}", path.display(), e))?;
            Box::new(BufReader::new(file))
        }
        (None, Some(account)) => Box::new(Cursor::new(format!("{account}\n"))),
        (None, None) => return Err("please choose either --account or --filename".into()),
    };

    let mut detail = match &args.output {
        Some(path) => {
            tracing::info!(path = %path.display(), "Writing detailed responses");
            let file = File::create(path)
                .map_err(|e| format!("cannot write to file {}: {}", path.display(), e))?;
            Some(BufWriter::new(file))
        }
        None => None,
    };

    let mut client = HibpClient::new(&config.client)?.with_observer(Arc::new(
        TracingObserver::new(config.observability.metrics_enabled),
    ));

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = scan_accounts(
        &mut client,
        Accounts::new(input),
        config.output.format,
        &mut out,
        detail.as_mut().map(|w| w as &mut dyn Write),
    )
    .await;

    if let Some(mut writer) = detail {
        writer.flush()?;
    }

    result?;
    Ok(())
}
