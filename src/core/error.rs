//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`WorkbenchError`] which covers every failure the repository
//! state engine can surface. It uses `thiserror` for ergonomic error definitions and
//! includes constructors for the common failure scenarios.
//!
//! # Public API
//! - [`WorkbenchError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, WorkbenchError>`
//!
//! # Error Categories
//! - **Process failures**: git exited non-zero or could not be spawned
//! - **Repository discovery**: not inside a repository, git2 discovery errors
//! - **Persistence**: workspace/config file read, write and parse failures
//! - **Workspace lookups**: unknown session or repository ids
//!
//! Parse anomalies and merge conflicts are deliberately absent: parsers recover locally
//! and a conflicted merge is reported as data.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkbenchError {
    // Repository discovery
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Git repository error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository has no working directory")]
    BareRepository,

    // Process failures
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    // File operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read '{path}': {source}")]
    FileReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    FileWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    // Workspace persistence
    #[error("Could not find config directory")]
    ConfigDirectoryNotFound,

    #[error("Failed to create config directory '{path}': {source}")]
    ConfigDirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read workspace file '{path}': {source}")]
    WorkspaceReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write workspace file '{path}': {source}")]
    WorkspaceWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse workspace file '{path}': {source}")]
    WorkspaceParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    #[error("Repository not found: {id}")]
    RepositoryNotFound { id: String },

    // Command-line usage
    #[error("{message}")]
    InvalidArgument { message: String },

    // Clipboard
    #[error("Clipboard unavailable: {message}")]
    Clipboard { message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using WorkbenchError
pub type Result<T> = std::result::Result<T, WorkbenchError>;

impl WorkbenchError {
    /// Create a command failure from the command text and its diagnostic output
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a spawn failure for a command that never started
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }

    pub fn file_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileReadFailed {
            path: path.into(),
            source,
        }
    }

    pub fn file_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a config directory creation failed error
    pub fn config_directory_creation_failed(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::ConfigDirectoryCreationFailed {
            path: path.into(),
            source,
        }
    }

    pub fn workspace_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WorkspaceReadFailed {
            path: path.into(),
            source,
        }
    }

    pub fn workspace_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WorkspaceWriteFailed {
            path: path.into(),
            source,
        }
    }

    pub fn workspace_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::WorkspaceParseFailed {
            path: path.into(),
            source,
        }
    }

    pub fn session_not_found(id: impl Into<String>) -> Self {
        Self::SessionNotFound { id: id.into() }
    }

    pub fn repository_not_found(id: impl Into<String>) -> Self {
        Self::RepositoryNotFound { id: id.into() }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard {
            message: message.into(),
        }
    }
}
