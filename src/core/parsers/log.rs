//! Commit log parsing.
//!
//! The log is requested with NUL between fields so subjects containing pipes or colons
//! never shift columns.

use crate::core::state::{Commit, ParseOutcome};

/// `--format` argument matching [`parse_log`]: hash, short hash, author, relative date, subject
pub const LOG_FORMAT: &str = "--format=%H%x00%h%x00%an%x00%ar%x00%s";

pub fn parse_log(output: &str) -> Vec<ParseOutcome<Commit>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_log_line)
        .collect()
}

fn parse_log_line(line: &str) -> ParseOutcome<Commit> {
    let fields: Vec<&str> = line.splitn(5, '\0').collect();
    let field = |i: usize| fields.get(i).copied().unwrap_or_default().to_string();

    let commit = Commit {
        hash: field(0),
        short_hash: field(1),
        author: field(2),
        date: field(3),
        subject: field(4),
    };

    if fields.len() == 5 {
        ParseOutcome::Parsed(commit)
    } else {
        ParseOutcome::Recovered(commit)
    }
}
