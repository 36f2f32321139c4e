//! Type-safe git file status enumeration.
//!
//! This module defines [`GitStatus`], the single-character status code carried by every
//! [`FileEntry`](crate::core::state::FileEntry). Porcelain output is decoded one column at
//! a time: the index column feeds staged entries, the worktree column feeds unstaged
//! entries.
//!
//! # Public API
//! - [`GitStatus`]: Main enumeration for all git file status types
//! - [`GitStatus::from_porcelain_char`]: Decode one porcelain column
//! - [`is_unmerged_code`]: Recognise the two-letter unmerged pairs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Git file status code.
///
/// Serialized as its porcelain character so persisted and displayed forms agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GitStatus {
    /// Modified file (M)
    Modified,
    /// Added/new file in index (A)
    Added,
    /// Deleted file (D)
    Deleted,
    /// Renamed file (R)
    Renamed,
    /// Copied file (C)
    Copied,
    /// Type changed (T)
    TypeChanged,
    /// Untracked file (?)
    Untracked,
    /// Unmerged/conflicted file (U)
    Unmerged,
    /// Any code this build does not know about
    Other(char),
}

impl GitStatus {
    /// Decode one porcelain status column.
    ///
    /// Returns `None` for the "unchanged" markers (space and `.`), so the caller can
    /// skip the column entirely.
    pub fn from_porcelain_char(c: char) -> Option<GitStatus> {
        let status = match c {
            ' ' | '.' => return None,
            'M' => GitStatus::Modified,
            'A' => GitStatus::Added,
            'D' => GitStatus::Deleted,
            'R' => GitStatus::Renamed,
            'C' => GitStatus::Copied,
            'T' => GitStatus::TypeChanged,
            '?' => GitStatus::Untracked,
            'U' => GitStatus::Unmerged,
            other => GitStatus::Other(other),
        };
        Some(status)
    }

    /// The porcelain character for this status
    pub fn as_char(&self) -> char {
        match self {
            GitStatus::Modified => 'M',
            GitStatus::Added => 'A',
            GitStatus::Deleted => 'D',
            GitStatus::Renamed => 'R',
            GitStatus::Copied => 'C',
            GitStatus::TypeChanged => 'T',
            GitStatus::Untracked => '?',
            GitStatus::Unmerged => 'U',
            GitStatus::Other(c) => *c,
        }
    }

    /// Get sort priority for status ordering
    pub fn sort_priority(&self, staged: bool) -> u8 {
        match (self, staged) {
            (GitStatus::Unmerged, _) => 0,
            (GitStatus::Added, true) => 1,
            (GitStatus::Modified, true) => 2,
            (GitStatus::Deleted, true) => 3,
            (GitStatus::Renamed, true) => 4,
            (GitStatus::Copied, true) => 5,
            (GitStatus::TypeChanged, true) => 6,
            (GitStatus::Modified, false) => 7,
            (GitStatus::Deleted, false) => 8,
            (GitStatus::Renamed, false) => 9,
            (GitStatus::Copied, false) => 10,
            (GitStatus::TypeChanged, false) => 11,
            (GitStatus::Untracked, _) => 12,
            _ => 13,
        }
    }

    /// Get human-readable description for status
    pub fn description(&self) -> &'static str {
        match self {
            GitStatus::Modified => "modified",
            GitStatus::Added => "new",
            GitStatus::Deleted => "deleted",
            GitStatus::Renamed => "renamed",
            GitStatus::Copied => "copied",
            GitStatus::TypeChanged => "type changed",
            GitStatus::Untracked => "untracked",
            GitStatus::Unmerged => "unmerged",
            GitStatus::Other(_) => "changed",
        }
    }
}

/// Two-letter porcelain codes git uses for unmerged paths:
/// both-deleted, added-by-us, deleted-by-them, added-by-them, deleted-by-us,
/// both-added and both-modified.
pub const UNMERGED_CODES: [&str; 7] = ["DD", "AU", "UD", "UA", "DU", "AA", "UU"];

/// Check whether an `XY` porcelain pair denotes an unmerged path
pub fn is_unmerged_code(code: &str) -> bool {
    UNMERGED_CODES.contains(&code)
}

impl fmt::Display for GitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl From<GitStatus> for String {
    fn from(status: GitStatus) -> Self {
        status.as_char().to_string()
    }
}

impl TryFrom<String> for GitStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                GitStatus::from_porcelain_char(c).ok_or_else(|| format!("not a status code: {value:?}"))
            }
            _ => Err(format!("status code must be one character: {value:?}")),
        }
    }
}
