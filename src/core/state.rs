//! Typed repository state produced by the parsers and the merge reconciler.
//!
//! Everything in here is plain data: parsed once from git output, never mutated in place,
//! replaced wholesale on the next refresh.
//!
//! # Public API
//! - [`FileEntry`], [`StatusSnapshot`]: porcelain status, split into independent views
//! - [`Commit`], [`Branch`], [`Stash`], [`Tag`], [`Remote`]: one record per output line
//! - [`ConflictMarker`], [`Conflict`], [`MergeState`], [`MergePhase`]: merge reconciliation
//! - [`ParseOutcome`]: tags whether a record was fully parsed or recovered by a fallback
//! - [`RepositorySnapshot`]: every read gathered by a single refresh

use crate::core::git_status::GitStatus;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub status: GitStatus,
    pub staged: bool,
}

/// Staged, unstaged and untracked are independent views: a partially staged path
/// shows up in both `staged` and `unstaged`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub staged: Vec<FileEntry>,
    pub unstaged: Vec<FileEntry>,
    pub untracked: Vec<FileEntry>,
}

impl StatusSnapshot {
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty() && self.untracked.is_empty()
    }

    /// Every entry in display order: unmerged first, then staged, unstaged, untracked.
    pub fn sorted_entries(&self) -> Vec<&FileEntry> {
        let mut entries: Vec<&FileEntry> = self
            .staged
            .iter()
            .chain(self.unstaged.iter())
            .chain(self.untracked.iter())
            .collect();
        entries.sort_by(|a, b| {
            a.status
                .sort_priority(a.staged)
                .cmp(&b.status.sort_priority(b.staged))
                .then_with(|| a.path.cmp(&b.path))
        });
        entries
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub short_hash: String,
    pub author: String,
    pub date: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub is_current: bool,
    pub is_remote: bool,
    pub upstream: Option<String>,
    pub last_commit_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stash {
    /// Authoritative identifier for apply/pop/drop/diff
    pub index: usize,
    pub name: String,
    pub branch: String,
    pub message: String,
}

/// Branch recorded on a stash line that matched neither stash message shape
pub const UNKNOWN_STASH_BRANCH: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub commit: String,
    pub date: String,
    pub message: Option<String>,
    pub is_annotated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    pub name: String,
    pub fetch_url: String,
    pub push_url: String,
}

/// Inclusive, 1-based line range. `end < start` means the range is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictMarker {
    pub start_line: usize,
    pub ours: LineRange,
    /// Present only for diff3-style blocks carrying a `|||||||` section
    pub base: Option<LineRange>,
    pub theirs: LineRange,
    pub end_line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub path: PathBuf,
    pub ours: String,
    pub theirs: String,
    pub base: Option<String>,
    pub markers: Vec<ConflictMarker>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePhase {
    NotMerging,
    Conflicted,
    ReadyToCommit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeState {
    pub in_progress: bool,
    pub current_branch: String,
    pub merging_branch: Option<String>,
    pub conflicts: Vec<Conflict>,
}

impl MergeState {
    pub fn not_merging(current_branch: impl Into<String>) -> Self {
        Self {
            current_branch: current_branch.into(),
            ..Default::default()
        }
    }

    pub fn phase(&self) -> MergePhase {
        match (self.in_progress, self.conflicts.is_empty()) {
            (false, _) => MergePhase::NotMerging,
            (true, false) => MergePhase::Conflicted,
            (true, true) => MergePhase::ReadyToCommit,
        }
    }
}

/// Result of a merge request. A conflicted merge is a valid outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged,
    Conflicted(MergeState),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AheadBehind {
    pub ahead: usize,
    pub behind: usize,
}

/// Distinguishes fully parsed records from best-effort ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    Parsed(T),
    Recovered(T),
}

impl<T> ParseOutcome<T> {
    pub fn value(&self) -> &T {
        match self {
            ParseOutcome::Parsed(v) | ParseOutcome::Recovered(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            ParseOutcome::Parsed(v) | ParseOutcome::Recovered(v) => v,
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, ParseOutcome::Recovered(_))
    }
}

/// Unwrap a batch of outcomes, logging how many needed the fallback path.
pub(crate) fn settle<T>(what: &str, outcomes: Vec<ParseOutcome<T>>) -> Vec<T> {
    let recovered = outcomes.iter().filter(|o| o.is_recovered()).count();
    if recovered > 0 {
        log::debug!("{recovered} {what} line(s) parsed with fallback");
    }
    outcomes.into_iter().map(ParseOutcome::into_inner).collect()
}

/// Everything a view needs after a change notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySnapshot {
    pub status: StatusSnapshot,
    pub commits: Vec<Commit>,
    pub branches: Vec<Branch>,
    pub stashes: Vec<Stash>,
    pub tags: Vec<Tag>,
    pub remotes: Vec<Remote>,
    pub merge_state: MergeState,
}
