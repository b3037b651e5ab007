//! Sequential account scanner.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::hibp::{HibpClient, HibpError};
use crate::output::{render_json, OutputFormat};
use crate::resilience::Sleeper;
use crate::scan::accounts::Accounts;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read accounts: {0}")]
    Input(#[source] io::Error),

    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),

    #[error("lookup failed for {account}: {source}")]
    Lookup {
        account: String,
        #[source]
        source: HibpError,
    },

    #[error("failed to render result for {account}: {source}")]
    Render {
        account: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Counts for a completed scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Accounts looked up.
    pub accounts: usize,
    /// Accounts with at least one breach or paste.
    pub leaked: usize,
}

/// Look up every account in order, writing one rendered line per account to
/// `out` and, when given, one JSON line per account to `detail`.
///
/// Stops at the first account whose lookup fails.
pub async fn scan_accounts<R, S>(
    client: &mut HibpClient<S>,
    accounts: Accounts<R>,
    format: OutputFormat,
    out: &mut dyn Write,
    detail: Option<&mut dyn Write>,
) -> Result<ScanSummary, ScanError>
where
    R: BufRead,
    S: Sleeper,
{
    let span = tracing::info_span!("scan", run_id = %Uuid::new_v4());
    run(client, accounts, format, out, detail)
        .instrument(span)
        .await
}

async fn run<R, S>(
    client: &mut HibpClient<S>,
    accounts: Accounts<R>,
    format: OutputFormat,
    out: &mut dyn Write,
    mut detail: Option<&mut dyn Write>,
) -> Result<ScanSummary, ScanError>
where
    R: BufRead,
    S: Sleeper,
{
    let mut summary = ScanSummary::default();

    for account in accounts {
        let account = account.map_err(ScanError::Input)?;

        let leaks = match client.fetch_leaks(&account).await {
            Ok(leaks) => leaks,
            Err(source) => {
                tracing::error!(account = %account, error = %source, "Lookup failed, stopping scan");
                return Err(ScanError::Lookup { account, source });
            }
        };

        tracing::info!(
            account = %account,
            breaches = leaks.breaches.len(),
            pastes = leaks.pastes.len(),
            "Account checked"
        );

        summary.accounts += 1;
        if !leaks.is_empty() {
            summary.leaked += 1;
        }

        let line = match format.render(&account, &leaks.breaches, &leaks.pastes) {
            Ok(line) => line,
            Err(source) => return Err(ScanError::Render { account, source }),
        };
        writeln!(out, "{line}").map_err(ScanError::Output)?;

        if let Some(detail) = detail.as_deref_mut() {
            let json = match render_json(&account, &leaks.breaches, &leaks.pastes) {
                Ok(json) => json,
                Err(source) => return Err(ScanError::Render { account, source }),
            };
            writeln!(detail, "{json}").map_err(ScanError::Output)?;
        }
    }

    out.flush().map_err(ScanError::Output)?;
    if let Some(detail) = detail {
        detail.flush().map_err(ScanError::Output)?;
    }

    tracing::info!(
        accounts = summary.accounts,
        leaked = summary.leaked,
        "Scan complete"
    );

    Ok(summary)
}
