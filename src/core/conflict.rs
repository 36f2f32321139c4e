//! Merge reconciliation helpers.
//!
//! Merge detection and marker scanning work on plain files and strings; retrieving the
//! three index stages needs git and lives on
//! [`RepositoryClient`](crate::core::git::RepositoryClient).

use crate::core::state::{ConflictMarker, LineRange};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub const MARKER_START: &str = "<<<<<<<";
pub const MARKER_BASE: &str = "|||||||";
pub const MARKER_SEPARATOR: &str = "=======";
pub const MARKER_END: &str = ">>>>>>>";

const MERGE_HEAD: &str = "MERGE_HEAD";
const MERGE_MSG: &str = "MERGE_MSG";

#[derive(Debug, Clone, Copy)]
enum Scan {
    Outside,
    Ours { start: usize },
    Base { start: usize, base: usize },
    Theirs { start: usize, base: Option<usize>, separator: usize },
}

/// git writes each marker as exactly seven characters, alone or followed by a space.
fn is_marker(line: &str, marker: &str) -> bool {
    line.strip_prefix(marker)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
}

/// Scan file content for complete conflict blocks. Line numbers are 1-based.
///
/// A start marker inside an open block restarts the block. Blocks without a separator or
/// without an end marker are dropped.
pub fn scan_conflict_markers(content: &str) -> Vec<ConflictMarker> {
    let mut markers = Vec::new();
    let mut state = Scan::Outside;

    for (index, line) in content.lines().enumerate() {
        let number = index + 1;

        if is_marker(line, MARKER_START) {
            state = Scan::Ours { start: number };
            continue;
        }

        state = match state {
            Scan::Ours { start } if is_marker(line, MARKER_BASE) => Scan::Base {
                start,
                base: number,
            },
            Scan::Ours { start } if is_marker(line, MARKER_SEPARATOR) => Scan::Theirs {
                start,
                base: None,
                separator: number,
            },
            Scan::Base { start, base } if is_marker(line, MARKER_SEPARATOR) => Scan::Theirs {
                start,
                base: Some(base),
                separator: number,
            },
            Scan::Ours { .. } | Scan::Base { .. } if is_marker(line, MARKER_END) => {
                Scan::Outside
            }
            Scan::Theirs {
                start,
                base,
                separator,
            } if is_marker(line, MARKER_END) => {
                let ours_end = base.unwrap_or(separator) - 1;
                markers.push(ConflictMarker {
                    start_line: start,
                    ours: LineRange::new(start + 1, ours_end),
                    base: base.map(|b| LineRange::new(b + 1, separator - 1)),
                    theirs: LineRange::new(separator + 1, number - 1),
                    end_line: number,
                });
                Scan::Outside
            }
            other => other,
        };
    }

    markers
}

fn merge_branch_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Merge branch '([^']+)'").ok())
        .as_ref()
}

/// Branch name from a `Merge branch '<name>'` message, if present.
pub fn merging_branch_from_message(message: &str) -> Option<String> {
    merge_branch_pattern()?
        .captures(message)
        .map(|caps| caps[1].to_string())
}

pub async fn is_merge_in_progress(git_dir: &Path) -> bool {
    tokio::fs::try_exists(git_dir.join(MERGE_HEAD))
        .await
        .unwrap_or(false)
}

/// Read `MERGE_MSG` and extract the merging branch. An unreadable file counts as no match.
pub async fn read_merging_branch(git_dir: &Path) -> Option<String> {
    match tokio::fs::read_to_string(git_dir.join(MERGE_MSG)).await {
        Ok(message) => merging_branch_from_message(&message),
        Err(e) => {
            log::debug!("no readable {MERGE_MSG}: {e}");
            None
        }
    }
}
