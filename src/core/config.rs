use crate::core::activity::DEFAULT_ACTIVITY_CAPACITY;
use crate::core::dirs::{ensure_directory, get_config_directory};
use crate::core::error::{Result, WorkbenchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.json";

/// User-tunable engine options, stored as `config.json` in the config directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Program spawned for every git invocation
    pub git_binary: String,
    /// Quiet window before the watcher fires, in milliseconds
    pub debounce_ms: u64,
    /// Commits fetched per log page
    pub log_limit: usize,
    /// Entries kept in each client's activity ledger
    pub activity_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            git_binary: "git".to_string(),
            debounce_ms: 300,
            log_limit: 50,
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn load_or_create() -> Result<Self> {
        let config_file = get_config_directory()?.join(CONFIG_FILE);
        Self::load_or_create_at(&config_file)
    }

    /// Load `path`, writing the defaults there first if it does not exist yet.
    pub fn load_or_create_at(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| WorkbenchError::file_read_failed(path, e))?;
            Ok(serde_json::from_str(&content)?)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let config_file = get_config_directory()?.join(CONFIG_FILE);
        self.save_to(&config_file)?;
        Ok(config_file)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            ensure_directory(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| WorkbenchError::file_write_failed(path, e))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
