//! Git process execution.
//!
//! [`CommandRunner`] is the only place the engine touches child processes. The production
//! implementation, [`GitCommandRunner`], spawns the configured git binary through tokio with
//! interactive credential prompts disabled so a missing credential fails fast instead of
//! hanging the caller.

use crate::core::error::{Result, WorkbenchError};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Receives each progress line of a streamed command, in arrival order.
pub type ProgressCallback = Box<dyn FnMut(&str) + Send>;

/// Captured result of one git invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub duration: Duration,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Diagnostic text for a failed command: stderr, or stdout when git wrote nothing there.
    pub fn failure_text(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }

    /// Stdout on success, [`WorkbenchError::CommandFailed`] otherwise.
    pub fn into_result(self) -> Result<String> {
        if self.success() {
            Ok(self.stdout)
        } else {
            let message = self.failure_text();
            Err(WorkbenchError::command_failed(self.command, message))
        }
    }
}

/// Render an argument list the way it is shown in logs and the activity ledger.
pub fn command_text(args: &[&str]) -> String {
    let mut text = String::from("git");
    for arg in args {
        text.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            text.push('"');
            text.push_str(arg);
            text.push('"');
        } else {
            text.push_str(arg);
        }
    }
    text
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `git <args>` in `cwd` and capture its output.
    ///
    /// A non-zero exit is not an error at this layer; only a failure to start the process is.
    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<CommandOutput>;

    /// Run `git <args>` in `cwd`, handing every stdout and stderr line to `on_line` as it
    /// arrives. The returned `stderr` is the concatenation of the stderr lines seen.
    async fn run_streaming(
        &self,
        cwd: &Path,
        args: &[&str],
        on_line: ProgressCallback,
    ) -> Result<CommandOutput>;
}

#[derive(Debug, Clone)]
pub struct GitCommandRunner {
    git_binary: String,
}

impl Default for GitCommandRunner {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCommandRunner {
    pub fn new(git_binary: impl Into<String>) -> Self {
        Self {
            git_binary: git_binary.into(),
        }
    }

    fn command(&self, cwd: &Path, args: &[&str]) -> Command {
        let mut command = Command::new(&self.git_binary);
        command
            .args(args)
            .current_dir(cwd)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never")
            .stdin(Stdio::null())
            .kill_on_drop(true);
        hide_console_on_windows(command.as_std_mut());
        command
    }
}

/// Spawning a console program from a GUI host opens a window on Windows unless suppressed.
fn hide_console_on_windows(_command: &mut std::process::Command) {
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        _command.creation_flags(CREATE_NO_WINDOW);
    }
}

#[async_trait]
impl CommandRunner for GitCommandRunner {
    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<CommandOutput> {
        let text = command_text(args);
        log::trace!("running {text} in {}", cwd.display());

        let started = Instant::now();
        let output = self
            .command(cwd, args)
            .output()
            .await
            .map_err(|e| WorkbenchError::spawn(text.clone(), e))?;

        Ok(CommandOutput {
            command: text,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            duration: started.elapsed(),
        })
    }

    async fn run_streaming(
        &self,
        cwd: &Path,
        args: &[&str],
        mut on_line: ProgressCallback,
    ) -> Result<CommandOutput> {
        let text = command_text(args);
        log::debug!("streaming {text} in {}", cwd.display());

        let started = Instant::now();
        let mut child = self
            .command(cwd, args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| WorkbenchError::spawn(text.clone(), e))?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(WorkbenchError::command_failed(text, "output pipes unavailable"));
        };

        let mut out_segments = BufReader::new(stdout).split(b'\n');
        let mut err_segments = BufReader::new(stderr).split(b'\n');
        let mut stdout_lines: Vec<String> = Vec::new();
        let mut stderr_lines: Vec<String> = Vec::new();
        let (mut out_done, mut err_done) = (false, false);

        while !(out_done && err_done) {
            tokio::select! {
                segment = out_segments.next_segment(), if !out_done => match segment {
                    Ok(Some(bytes)) => {
                        for line in progress_lines(&bytes) {
                            on_line(&line);
                            stdout_lines.push(line);
                        }
                    }
                    _ => out_done = true,
                },
                segment = err_segments.next_segment(), if !err_done => match segment {
                    Ok(Some(bytes)) => {
                        for line in progress_lines(&bytes) {
                            on_line(&line);
                            stderr_lines.push(line);
                        }
                    }
                    _ => err_done = true,
                },
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| WorkbenchError::spawn(text.clone(), e))?;

        Ok(CommandOutput {
            command: text,
            stdout: stdout_lines.join("\n"),
            stderr: stderr_lines.join("\n"),
            exit_code: status.code(),
            duration: started.elapsed(),
        })
    }
}

/// git redraws progress with carriage returns; each redraw counts as its own line.
fn progress_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .split('\r')
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
