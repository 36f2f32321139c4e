//! Git repository management and setup utilities
//!
//! Every test repository lives in its own temporary directory, starts on `main` and carries
//! local identity and merge settings so results do not depend on the host's git config.

#![allow(dead_code)]

use assert_cmd::prelude::*;
use git_workbench::core::error::{Result, WorkbenchError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test repository plus an isolated config directory for the binary.
///
/// Both temporary directories must outlive the test.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub config_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `git-workbench` running inside this repository with its own config directory.
    pub fn workbench(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("git-workbench").map_err(|e| {
            WorkbenchError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))
        })?;
        cmd.current_dir(&self.path)
            .env("XDG_CONFIG_HOME", self.config_dir.path())
            .env("HOME", self.config_dir.path())
            .env("NO_COLOR", "1");
        Ok(cmd)
    }
}

/// Run git in `repo_path` and return its stdout. A non-zero exit is an error.
pub fn git(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()?;
    if !output.status.success() {
        return Err(WorkbenchError::command_failed(
            format!("git {}", args.join(" ")),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Fresh repository on an unborn `main` branch.
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let config_dir = TempDir::new()?;
    let repo_path = temp_dir.path().canonicalize()?;

    git(&repo_path, &["init", "-q"])?;
    git(&repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    git(&repo_path, &["config", "user.name", "Test User"])?;
    git(&repo_path, &["config", "user.email", "test@example.com"])?;
    git(&repo_path, &["config", "commit.gpgsign", "false"])?;
    git(&repo_path, &["config", "merge.conflictStyle", "merge"])?;

    Ok(TestRepo {
        temp_dir,
        config_dir,
        path: repo_path,
    })
}

/// Repository with `initial.txt` committed on `main`.
pub fn setup_test_repo_with_initial_commit() -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    create_file(&repo.path, "initial.txt", "initial content\n")?;
    git_add(&repo.path, "initial.txt")?;
    git_commit(&repo.path, "Initial commit")?;

    Ok(repo)
}

pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let path = repo_path.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn read_file(repo_path: &Path, filename: &str) -> Result<String> {
    Ok(fs::read_to_string(repo_path.join(filename))?)
}

/// `filename` may be "." for everything.
pub fn git_add(repo_path: &Path, filename: &str) -> Result<()> {
    git(repo_path, &["add", filename]).map(drop)
}

pub fn git_commit(repo_path: &Path, message: &str) -> Result<()> {
    git(repo_path, &["commit", "-q", "-m", message]).map(drop)
}

pub fn git_checkout(repo_path: &Path, args: &[&str]) -> Result<()> {
    let mut full = vec!["checkout", "-q"];
    full.extend_from_slice(args);
    git(repo_path, &full).map(drop)
}

/// Write `content` to `filename`, stage it and commit.
pub fn commit_file(repo_path: &Path, filename: &str, content: &str, message: &str) -> Result<()> {
    create_file(repo_path, filename, content)?;
    git_add(repo_path, filename)?;
    git_commit(repo_path, message)
}

/// Creates multiple test files with sequential content
pub fn create_test_files(repo_path: &Path, filenames: &[&str]) -> Result<()> {
    for (i, filename) in filenames.iter().enumerate() {
        let content = format!("content{}\nline 2\n", i + 1);
        create_file(repo_path, filename, &content)?;
    }
    Ok(())
}

pub fn modify_test_files(repo_path: &Path, filenames: &[&str]) -> Result<()> {
    for (i, filename) in filenames.iter().enumerate() {
        let content = format!("modified{}\nline 2\nnew line\n", i + 1);
        create_file(repo_path, filename, &content)?;
    }
    Ok(())
}
