use crate::core::error::{Result, WorkbenchError};
use std::path::PathBuf;

pub const APP_DIRECTORY: &str = "git-workbench";

/// Per-user configuration directory: `$XDG_CONFIG_HOME/git-workbench` (or
/// `~/.config/git-workbench`) on Unix, Application Support on macOS, roaming AppData on
/// Windows.
pub fn get_config_directory() -> Result<PathBuf> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config"))),
        "macos" => dirs::home_dir().map(|home| home.join("Library/Application Support")),
        _ => dirs::config_dir(),
    };

    base.map(|dir| dir.join(APP_DIRECTORY))
        .ok_or(WorkbenchError::ConfigDirectoryNotFound)
}

/// Create `dir` and any missing parents.
pub fn ensure_directory(dir: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| WorkbenchError::config_directory_creation_failed(dir, e))
}
