//! Branch listing parsing.
//!
//! Lines come from `git for-each-ref` over `refs/heads` and `refs/remotes` with four
//! pipe-delimited fields: full refname, upstream, relative committer date and the HEAD
//! marker. Fields are split from the right so a refname containing `|` survives.

use crate::core::state::{Branch, ParseOutcome};

pub const BRANCH_FORMAT: &str =
    "--format=%(refname)|%(upstream:short)|%(committerdate:relative)|%(HEAD)";

const LOCAL_PREFIX: &str = "refs/heads/";
const REMOTE_PREFIX: &str = "refs/remotes/";

pub fn parse_branches(output: &str) -> Vec<ParseOutcome<Branch>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_branch_line)
        .collect()
}

fn parse_branch_line(line: &str) -> Option<ParseOutcome<Branch>> {
    let mut fields: Vec<&str> = line.rsplitn(4, '|').collect();
    fields.reverse();
    let well_formed = fields.len() == 4;

    let refname = fields[0].trim();
    let (name, is_remote) = if let Some(rest) = refname.strip_prefix(REMOTE_PREFIX) {
        (rest, true)
    } else if let Some(rest) = refname.strip_prefix(LOCAL_PREFIX) {
        (rest, false)
    } else {
        // Short names from older formats: treat as local.
        (refname, false)
    };

    // `origin/HEAD` is a symbolic pointer, not a branch.
    if is_remote && (name.ends_with("/HEAD") || !name.contains('/')) {
        return None;
    }
    if name.is_empty() {
        return None;
    }

    let optional = |i: usize| {
        fields
            .get(i)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let branch = Branch {
        name: name.to_string(),
        is_current: fields.get(3).map(|s| s.trim() == "*").unwrap_or(false),
        is_remote,
        upstream: if is_remote { None } else { optional(1) },
        last_commit_date: optional(2),
        description: None,
    };

    Some(if well_formed {
        ParseOutcome::Parsed(branch)
    } else {
        ParseOutcome::Recovered(branch)
    })
}
