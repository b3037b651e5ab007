//! Account list reading.

use std::io::{self, BufRead, Lines};

/// Trimmed account, or `None` for a blank line.
pub fn normalize_account(line: &str) -> Option<&str> {
    let account = line.trim();
    (!account.is_empty()).then_some(account)
}

/// Lazily yields one account per non-blank input line.
pub struct Accounts<R> {
    lines: Lines<R>,
}

impl<R: BufRead> Accounts<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for Accounts<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    if let Some(account) = normalize_account(&line) {
                        return Some(Ok(account.to_string()));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
