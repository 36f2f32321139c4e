//! Workspace persistence: recently opened repositories and named multi-repository sessions.
//!
//! The whole [`WorkspaceConfig`] lives in one JSON file and is rewritten on every mutation.
//! A mutation is applied to a copy, written to disk, and only then becomes the in-memory
//! state, so a failed write leaves both sides unchanged.
//!
//! # Public API
//! - [`WorkspaceStore`]: async CRUD over sessions and the recent list
//! - [`Repository`], [`WorkspaceSession`], [`WorkspaceConfig`]: the persisted records

use crate::core::dirs::get_config_directory;
use crate::core::error::{Result, WorkbenchError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

pub const WORKSPACE_FILE: &str = "workspace.json";
pub const MAX_RECENT_REPOSITORIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub path: PathBuf,
    pub name: String,
    pub last_accessed: DateTime<Utc>,
}

impl Repository {
    /// Fresh record for `path`, named after its final segment.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            id: Uuid::new_v4().to_string(),
            path,
            name,
            last_accessed: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSession {
    pub id: String,
    pub name: String,
    pub repositories: Vec<Repository>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_repository_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl WorkspaceSession {
    pub fn active_repository(&self) -> Option<&Repository> {
        let id = self.active_repository_id.as_deref()?;
        self.repositories.iter().find(|r| r.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub sessions: Vec<WorkspaceSession>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_session_id: Option<String>,
    #[serde(default)]
    pub recent_repositories: Vec<Repository>,
}

impl WorkspaceConfig {
    fn session_mut(&mut self, id: &str) -> Result<&mut WorkspaceSession> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| WorkbenchError::session_not_found(id))
    }
}

pub struct WorkspaceStore {
    path: PathBuf,
    config: Mutex<WorkspaceConfig>,
}

impl WorkspaceStore {
    /// Store backed by `path`. Nothing is read until [`initialize`](Self::initialize).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Mutex::new(WorkspaceConfig::default()),
        }
    }

    /// Store backed by `workspace.json` in the user config directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::open(get_config_directory()?.join(WORKSPACE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file, or create it with an empty config when it does not exist.
    pub async fn initialize(&self) -> Result<()> {
        let mut config = self.config.lock().await;
        if tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            let content = tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| WorkbenchError::workspace_read_failed(&self.path, e))?;
            *config = serde_json::from_str(&content)
                .map_err(|e| WorkbenchError::workspace_parse_failed(&self.path, e))?;
            log::debug!(
                "loaded workspace with {} session(s) from {}",
                config.sessions.len(),
                self.path.display()
            );
        } else {
            *config = WorkspaceConfig::default();
            write_config(&self.path, &config).await?;
            log::debug!("created workspace file {}", self.path.display());
        }
        Ok(())
    }

    pub async fn snapshot(&self) -> WorkspaceConfig {
        self.config.lock().await.clone()
    }

    /// Apply `change` to a copy of the config, persist it, then publish it.
    async fn update<T>(
        &self,
        change: impl FnOnce(&mut WorkspaceConfig) -> Result<T>,
    ) -> Result<T> {
        let mut config = self.config.lock().await;
        let mut next = config.clone();
        let value = change(&mut next)?;
        write_config(&self.path, &next).await?;
        *config = next;
        Ok(value)
    }

    // ---- recent repositories ----

    /// Move `path` to the front of the recent list, creating its record if needed.
    pub async fn add_repository(&self, path: impl Into<PathBuf>) -> Result<Repository> {
        let repository = Repository::from_path(path);
        self.update(move |config| {
            config
                .recent_repositories
                .retain(|r| r.path != repository.path);
            config.recent_repositories.insert(0, repository.clone());
            config
                .recent_repositories
                .truncate(MAX_RECENT_REPOSITORIES);
            Ok(repository)
        })
        .await
    }

    pub async fn recent_repositories(&self) -> Vec<Repository> {
        self.config.lock().await.recent_repositories.clone()
    }

    // ---- sessions ----

    pub async fn create_session(
        &self,
        name: &str,
        repositories: Vec<Repository>,
    ) -> Result<WorkspaceSession> {
        let now = Utc::now();
        let session = WorkspaceSession {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            active_repository_id: repositories.first().map(|r| r.id.clone()),
            repositories,
            created_at: now,
            last_modified: now,
        };
        self.update(move |config| {
            config.sessions.push(session.clone());
            Ok(session)
        })
        .await
    }

    pub async fn sessions(&self) -> Vec<WorkspaceSession> {
        self.config.lock().await.sessions.clone()
    }

    pub async fn get_session(&self, id: &str) -> Option<WorkspaceSession> {
        self.config
            .lock()
            .await
            .sessions
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Replace the stored session with the same id.
    pub async fn update_session(&self, session: WorkspaceSession) -> Result<WorkspaceSession> {
        self.update(move |config| {
            let stored = config.session_mut(&session.id)?;
            *stored = session;
            stored.last_modified = Utc::now();
            Ok(stored.clone())
        })
        .await
    }

    pub async fn delete_session(&self, id: &str) -> Result<()> {
        self.update(|config| {
            let before = config.sessions.len();
            config.sessions.retain(|s| s.id != id);
            if config.sessions.len() == before {
                return Err(WorkbenchError::session_not_found(id));
            }
            if config.active_session_id.as_deref() == Some(id) {
                config.active_session_id = None;
            }
            Ok(())
        })
        .await
    }

    /// Point the workspace at session `id`, or at none.
    pub async fn set_active_session(&self, id: Option<&str>) -> Result<()> {
        self.update(|config| {
            if let Some(id) = id {
                config.session_mut(id)?;
            }
            config.active_session_id = id.map(str::to_string);
            Ok(())
        })
        .await
    }

    pub async fn active_session(&self) -> Option<WorkspaceSession> {
        let config = self.config.lock().await;
        let id = config.active_session_id.as_deref()?;
        config.sessions.iter().find(|s| s.id == id).cloned()
    }

    // ---- repositories inside a session ----

    /// Add `path` to a session. A path already present returns the existing record.
    pub async fn add_repository_to_session(
        &self,
        session_id: &str,
        path: impl Into<PathBuf>,
    ) -> Result<Repository> {
        let candidate = Repository::from_path(path);
        self.update(move |config| {
            let session = config.session_mut(session_id)?;
            if let Some(existing) = session
                .repositories
                .iter()
                .find(|r| r.path == candidate.path)
            {
                return Ok(existing.clone());
            }
            if session.active_repository_id.is_none() {
                session.active_repository_id = Some(candidate.id.clone());
            }
            session.repositories.push(candidate.clone());
            session.last_modified = Utc::now();
            Ok(candidate)
        })
        .await
    }

    /// Remove a repository from a session. If it was active, the first remaining one
    /// becomes active.
    pub async fn remove_repository_from_session(
        &self,
        session_id: &str,
        repository_id: &str,
    ) -> Result<()> {
        self.update(|config| {
            let session = config.session_mut(session_id)?;
            let before = session.repositories.len();
            session.repositories.retain(|r| r.id != repository_id);
            if session.repositories.len() == before {
                return Err(WorkbenchError::repository_not_found(repository_id));
            }
            if session.active_repository_id.as_deref() == Some(repository_id) {
                session.active_repository_id = session.repositories.first().map(|r| r.id.clone());
            }
            session.last_modified = Utc::now();
            Ok(())
        })
        .await
    }

    pub async fn set_active_repository(&self, session_id: &str, repository_id: &str) -> Result<()> {
        self.update(|config| {
            let session = config.session_mut(session_id)?;
            let now = Utc::now();
            let repository = session
                .repositories
                .iter_mut()
                .find(|r| r.id == repository_id)
                .ok_or_else(|| WorkbenchError::repository_not_found(repository_id))?;
            repository.last_accessed = now;
            session.active_repository_id = Some(repository_id.to_string());
            session.last_modified = now;
            Ok(())
        })
        .await
    }
}

/// Write through a temporary sibling so a crash never leaves a half-written file.
async fn write_config(path: &Path, config: &WorkspaceConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| WorkbenchError::config_directory_creation_failed(parent, e))?;
    }
    let content = serde_json::to_string_pretty(config)?;
    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, content)
        .await
        .map_err(|e| WorkbenchError::workspace_write_failed(&tmp_path, e))?;

    if let Err(rename_err) = tokio::fs::rename(&tmp_path, path).await {
        // Windows refuses to rename over an existing file.
        log::debug!("rename over {} failed: {rename_err}", path.display());
        let copied = tokio::fs::copy(&tmp_path, path).await;
        let _ = tokio::fs::remove_file(&tmp_path).await;
        copied.map_err(|e| WorkbenchError::workspace_write_failed(path, e))?;
    }
    Ok(())
}
