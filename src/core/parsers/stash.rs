//! Stash list parsing.
//!
//! `git stash list` prints `stash@{N}: WIP on <branch>: <msg>` for automatic messages and
//! `stash@{N}: On <branch>: <msg>` for named ones. Anything else still yields a record so
//! the stash stays addressable by index.

use crate::core::state::{ParseOutcome, Stash, UNKNOWN_STASH_BRANCH};
use regex::Regex;
use std::sync::OnceLock;

fn stash_line() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^stash@\{(\d+)\}: (?:WIP on|On) ([^:]+): (.*)$").ok())
        .as_ref()
}

fn stash_index() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(\d+)\}").ok()).as_ref()
}

pub fn parse_stashes(output: &str) -> Vec<ParseOutcome<Stash>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_stash_line)
        .collect()
}

fn parse_stash_line(line: &str) -> ParseOutcome<Stash> {
    if let Some(caps) = stash_line().and_then(|re| re.captures(line)) {
        if let Ok(index) = caps[1].parse::<usize>() {
            return ParseOutcome::Parsed(Stash {
                index,
                name: format!("stash@{{{index}}}"),
                branch: caps[2].to_string(),
                message: caps[3].to_string(),
            });
        }
    }

    let index = stash_index()
        .and_then(|re| re.captures(line))
        .and_then(|caps| caps[1].parse::<usize>().ok())
        .unwrap_or(0);
    let message = line
        .split_once(':')
        .map(|(_, rest)| rest.trim())
        .unwrap_or(line.trim())
        .to_string();

    ParseOutcome::Recovered(Stash {
        index,
        name: format!("stash@{{{index}}}"),
        branch: UNKNOWN_STASH_BRANCH.to_string(),
        message,
    })
}
