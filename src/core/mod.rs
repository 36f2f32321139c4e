//! Repository state engine.
//!
//! Leaves first: the process [`runner`], the [`activity`] ledger, the pure [`parsers`],
//! merge [`conflict`] helpers, then the [`git`] client that composes them. The [`watcher`]
//! and [`workspace`] store stand on their own.

pub mod activity;
pub mod clipboard;
pub mod colors;
pub mod config;
pub mod conflict;
pub mod dirs;
pub mod error;
pub mod git;
pub mod git_status;
pub mod output;
pub mod parsers;
pub mod runner;
pub mod state;
pub mod watcher;
pub mod workspace;

// === Error handling ===
pub use error::{Result, WorkbenchError};

// === Repository client ===
pub use git::{RepositoryClient, ResetMode, Resolution};
pub use runner::{CommandOutput, CommandRunner, GitCommandRunner, ProgressCallback};
pub use activity::{ActivityLedger, CommandRecord};
pub use config::EngineConfig;

// === State ===
pub use git_status::GitStatus;
pub use state::{
    AheadBehind, Branch, Commit, Conflict, ConflictMarker, FileEntry, LineRange, MergeOutcome,
    MergePhase, MergeState, ParseOutcome, Remote, RepositorySnapshot, Stash, StatusSnapshot, Tag,
};

// === Watching and workspaces ===
pub use watcher::ChangeWatcher;
pub use workspace::{Repository, WorkspaceConfig, WorkspaceSession, WorkspaceStore};

// === Output formatting ===
pub use colors::{format_ahead_behind, format_file_status, get_status_color_style};
pub use output::{
    print_error, print_info, print_progress, print_section_header, print_success, print_warning,
};
