//! Git Workbench - a repository state engine for terminal git clients.
//!
//! The engine shells out to `git`, parses its output into typed state, reconciles merge
//! conflicts, watches the working tree for external changes and persists multi-repository
//! workspaces. The `git-workbench` binary is a thin command-line host over it.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module:
//! - [`RepositoryClient`]: reads and mutations against one repository
//! - [`ChangeWatcher`]: debounced change notifications
//! - [`WorkspaceStore`]: recent repositories and sessions
//! - [`WorkbenchError`] and [`Result`]

pub mod commands;
pub mod core;

pub use self::core::{
    ActivityLedger,
    Branch,
    ChangeWatcher,
    CommandRecord,
    CommandRunner,
    Commit,
    Conflict,
    ConflictMarker,
    EngineConfig,
    FileEntry,
    GitCommandRunner,
    GitStatus,
    MergeOutcome,
    MergeState,
    Remote,
    Repository,
    RepositoryClient,
    RepositorySnapshot,
    Resolution,
    Result,
    Stash,
    StatusSnapshot,
    Tag,
    WorkbenchError,
    WorkspaceSession,
    WorkspaceStore,
};
