//! Rendering of per-account results.
//!
//! The output mode is chosen once at startup and every account goes through
//! [`OutputFormat::render`].

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::hibp::{Breach, Paste};

/// Data class that marks a breach as having leaked credentials.
const PASSWORDS: &str = "Passwords";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
pub enum OutputFormat {
    /// One human readable summary line per account.
    #[default]
    #[serde(rename = "text")]
    #[value(name = "text")]
    Text,
    /// One JSON object per account.
    #[serde(rename = "jsonl")]
    #[value(name = "jsonl")]
    JsonLines,
}

impl OutputFormat {
    /// Render one account's results as a single line, without the newline.
    pub fn render(
        self,
        account: &str,
        breaches: &[Breach],
        pastes: &[Paste],
    ) -> Result<String, serde_json::Error> {
        match self {
            OutputFormat::Text => Ok(render_text(account, breaches, pastes)),
            OutputFormat::JsonLines => render_json(account, breaches, pastes),
        }
    }
}

/// `{"account": .., "breaches": [..], "pastes": [..]}` on one line.
pub fn render_json(
    account: &str,
    breaches: &[Breach],
    pastes: &[Paste],
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&serde_json::json!({
        "account": account,
        "breaches": breaches,
        "pastes": pastes,
    }))
}

/// Summary line, e.g.
/// `a@b.c: 2 breaches between 2016-2017. latest from example.com [verified account only] | 1 paste from Pastebin`.
pub fn render_text(account: &str, breaches: &[Breach], pastes: &[Paste]) -> String {
    if breaches.is_empty() && pastes.is_empty() {
        return format!("{account}: no leaks");
    }

    let mut msg = format!("{account}: ");

    match (breaches.first(), breaches.last()) {
        (Some(latest), Some(oldest)) => {
            let verified = if latest.is_verified {
                "verified"
            } else {
                "unverified"
            };
            let exposure = if latest.exposes(PASSWORDS) {
                "password"
            } else {
                "account only"
            };
            let _ = write!(
                msg,
                "{} between {}-{}. latest from {} [{} {}]",
                plural(breaches.len(), "breach", "breaches"),
                oldest.breach_year().unwrap_or("?"),
                latest.breach_year().unwrap_or("?"),
                latest.display_name(),
                verified,
                exposure,
            );
        }
        _ => msg.push_str("no breaches"),
    }

    if !pastes.is_empty() {
        let sources = unique_in_order(pastes.iter().map(|p| p.source.as_str()));
        let _ = write!(
            msg,
            " | {} from {}",
            plural(pastes.len(), "paste", "pastes"),
            sources.join(",")
        );
    }

    msg
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Drop repeated items, keeping the first occurrence of each.
fn unique_in_order<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}
