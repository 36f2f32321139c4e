//! Repository client: every read and write the engine performs against one working tree.
//!
//! [`RepositoryClient`] shells out through a [`CommandRunner`] and feeds the output through
//! the parsers in [`crate::core::parsers`]. Repository discovery is the only place `git2`
//! is used; everything else goes through the git binary so hooks, config and credential
//! helpers behave exactly as they do on the command line.
//!
//! # Public API
//! - [`RepositoryClient`]: reads, mutations and the activity ledger for one repository
//! - [`Resolution`]: how a conflicted path should be resolved
//! - [`ResetMode`]: `--soft`, `--mixed` or `--hard`
//!
//! Every mutating call is recorded in the client's
//! [`ActivityLedger`](crate::core::activity::ActivityLedger), success or not. Reads are only
//! logged.

use crate::core::{
    activity::{ActivityLedger, CommandRecord},
    config::EngineConfig,
    conflict::{is_merge_in_progress, read_merging_branch, scan_conflict_markers},
    error::{Result, WorkbenchError},
    parsers::{
        parse_branches, parse_log, parse_remotes, parse_stashes, parse_status,
        parse_unmerged_paths, parse_tags, BRANCH_FORMAT, LOG_FORMAT, TAG_FORMAT,
    },
    runner::{command_text, CommandOutput, CommandRunner, GitCommandRunner, ProgressCallback},
    state::{
        settle, AheadBehind, Branch, Commit, Conflict, MergeOutcome, MergeState, Remote,
        RepositorySnapshot, Stash, StatusSnapshot, Tag,
    },
};
use git2::Repository;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const STATUS_ARGS: [&str; 5] = [
    "-c",
    "core.quotePath=false",
    "status",
    "--porcelain",
    "--untracked-files=all",
];

/// How a conflicted path is settled before it is staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Keep the current branch's version
    Ours,
    /// Keep the merged branch's version
    Theirs,
    /// Write this exact text to the working tree
    Content(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetMode {
    Soft,
    #[default]
    Mixed,
    Hard,
}

impl ResetMode {
    pub fn as_flag(&self) -> &'static str {
        match self {
            ResetMode::Soft => "--soft",
            ResetMode::Mixed => "--mixed",
            ResetMode::Hard => "--hard",
        }
    }
}

pub struct RepositoryClient {
    workdir: PathBuf,
    git_dir: PathBuf,
    runner: Arc<dyn CommandRunner>,
    ledger: Mutex<ActivityLedger>,
    log_limit: usize,
}

impl RepositoryClient {
    /// Discover the repository containing `path` and bind a client to its working tree.
    pub fn open<P: AsRef<Path>>(path: P, config: &EngineConfig) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                WorkbenchError::NotInGitRepo
            } else {
                WorkbenchError::Git(e)
            }
        })?;
        let workdir = repo
            .workdir()
            .ok_or(WorkbenchError::BareRepository)?
            .to_path_buf();
        let git_dir = repo.path().to_path_buf();
        log::debug!(
            "opened repository at {} (git dir {})",
            workdir.display(),
            git_dir.display()
        );

        let runner = Arc::new(GitCommandRunner::new(config.git_binary.clone()));
        Ok(Self::with_runner(workdir, git_dir, runner, config.activity_capacity)
            .with_log_limit(config.log_limit))
    }

    pub fn with_runner(
        workdir: impl Into<PathBuf>,
        git_dir: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
        activity_capacity: usize,
    ) -> Self {
        Self {
            workdir: workdir.into(),
            git_dir: git_dir.into(),
            runner,
            ledger: Mutex::new(ActivityLedger::with_capacity(activity_capacity)),
            log_limit: EngineConfig::default().log_limit,
        }
    }

    pub fn with_log_limit(mut self, log_limit: usize) -> Self {
        self.log_limit = log_limit.max(1);
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Recorded mutations, most recent first.
    pub fn activity(&self) -> Vec<CommandRecord> {
        self.ledger
            .lock()
            .map(|ledger| ledger.list())
            .unwrap_or_default()
    }

    // ---- plumbing ----

    async fn read(&self, args: &[&str]) -> Result<String> {
        let output = self.runner.run(&self.workdir, args).await?;
        if !output.success() {
            log::debug!("{} exited {:?}: {}", output.command, output.exit_code, output.failure_text());
        }
        output.into_result()
    }

    /// Run a read whose failure just means "nothing there".
    async fn read_optional(&self, args: &[&str]) -> Option<String> {
        match self.runner.run(&self.workdir, args).await {
            Ok(output) if output.success() => Some(output.stdout),
            Ok(output) => {
                log::debug!("{} exited {:?}: {}", output.command, output.exit_code, output.failure_text());
                None
            }
            Err(e) => {
                log::debug!("{e}");
                None
            }
        }
    }

    fn record(&self, output: &CommandOutput) {
        self.record_as(output, output.success());
    }

    /// Record `output` with an explicit verdict, for calls whose non-zero exit is expected.
    fn record_as(&self, output: &CommandOutput, success: bool) {
        let error = (!success).then(|| output.failure_text());
        if let Ok(mut ledger) = self.ledger.lock() {
            ledger.record(output.command.clone(), output.duration, success, error);
        }
    }

    fn record_spawn_failure(&self, args: &[&str], error: &WorkbenchError) {
        if let Ok(mut ledger) = self.ledger.lock() {
            ledger.record(
                command_text(args),
                std::time::Duration::ZERO,
                false,
                Some(error.to_string()),
            );
        }
    }

    /// Run a mutating command. Only a spawn failure is recorded here.
    async fn run_mutation(&self, args: &[&str]) -> Result<CommandOutput> {
        self.runner.run(&self.workdir, args).await.map_err(|e| {
            self.record_spawn_failure(args, &e);
            e
        })
    }

    /// Run a mutating command and record it, leaving exit-code handling to the caller.
    async fn run_recorded(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.run_mutation(args).await?;
        self.record(&output);
        if output.success() {
            log::debug!("{} ({:?})", output.command, output.duration);
        } else {
            log::warn!("{} failed: {}", output.command, output.failure_text());
        }
        Ok(output)
    }

    async fn mutate(&self, args: &[&str]) -> Result<String> {
        self.run_recorded(args).await?.into_result()
    }

    async fn mutate_streaming(
        &self,
        args: &[&str],
        progress: Option<ProgressCallback>,
    ) -> Result<String> {
        let on_line: ProgressCallback = match progress {
            Some(callback) => callback,
            None => Box::new(|line: &str| log::trace!("{line}")),
        };
        match self.runner.run_streaming(&self.workdir, args, on_line).await {
            Ok(output) => {
                self.record(&output);
                output.into_result()
            }
            Err(e) => {
                self.record_spawn_failure(args, &e);
                Err(e)
            }
        }
    }

    async fn mutate_paths(&self, base: &[&str], paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let owned: Vec<String> = paths.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        let mut args: Vec<&str> = base.to_vec();
        args.push("--");
        args.extend(owned.iter().map(String::as_str));
        self.mutate(&args).await.map(drop)
    }

    // ---- reads ----

    pub async fn status(&self) -> Result<StatusSnapshot> {
        let output = self.read(&STATUS_ARGS).await?;
        Ok(parse_status(&output))
    }

    /// Latest `limit` commits reachable from HEAD. An unborn branch has none.
    pub async fn log(&self, limit: usize) -> Result<Vec<Commit>> {
        let limit = limit.to_string();
        let output = self
            .runner
            .run(&self.workdir, &["log", LOG_FORMAT, "-n", &limit])
            .await?;
        if !output.success() && output.failure_text().contains("does not have any commits") {
            return Ok(Vec::new());
        }
        Ok(settle("log", parse_log(&output.into_result()?)))
    }

    pub async fn branches(&self) -> Result<Vec<Branch>> {
        let output = self
            .read(&["for-each-ref", BRANCH_FORMAT, "refs/heads", "refs/remotes"])
            .await?;
        let mut branches = settle("branch", parse_branches(&output));

        let descriptions = self.branch_descriptions().await;
        for branch in branches.iter_mut().filter(|b| !b.is_remote) {
            branch.description = descriptions
                .iter()
                .find(|(name, _)| *name == branch.name)
                .map(|(_, text)| text.clone());
        }
        Ok(branches)
    }

    /// Stored `branch.<name>.description` values. Missing config is not an error.
    async fn branch_descriptions(&self) -> Vec<(String, String)> {
        let Some(output) = self
            .read_optional(&["config", "-z", "--get-regexp", r"^branch\..*\.description$"])
            .await
        else {
            return Vec::new();
        };

        output
            .split('\0')
            .filter_map(|entry| {
                let (key, value) = entry.split_once('\n')?;
                let name = key.strip_prefix("branch.")?.strip_suffix(".description")?;
                let value = value.trim();
                (!value.is_empty()).then(|| (name.to_string(), value.to_string()))
            })
            .collect()
    }

    pub async fn stashes(&self) -> Result<Vec<Stash>> {
        let output = self.read(&["stash", "list"]).await?;
        Ok(settle("stash", parse_stashes(&output)))
    }

    pub async fn tags(&self) -> Result<Vec<Tag>> {
        let output = self
            .read(&["tag", "-l", "--sort=-creatordate", TAG_FORMAT])
            .await?;
        Ok(settle("tag", parse_tags(&output)))
    }

    pub async fn remotes(&self) -> Result<Vec<Remote>> {
        let output = self.read(&["remote", "-v"]).await?;
        Ok(parse_remotes(&output))
    }

    /// Current branch name, or `detached at <short hash>`.
    pub async fn current_branch(&self) -> Result<String> {
        if let Some(name) = self
            .read_optional(&["symbolic-ref", "--short", "-q", "HEAD"])
            .await
        {
            return Ok(name.trim().to_string());
        }
        let hash = self.read(&["rev-parse", "--short", "HEAD"]).await?;
        Ok(format!("detached at {}", hash.trim()))
    }

    /// Commits ahead of and behind the upstream. `None` when there is no upstream or the
    /// count cannot be computed.
    pub async fn ahead_behind(&self) -> Option<AheadBehind> {
        let output = self
            .read_optional(&["rev-list", "--left-right", "--count", "HEAD...@{upstream}"])
            .await?;
        let mut counts = output.split_whitespace().map(str::parse::<usize>);
        match (counts.next(), counts.next()) {
            (Some(Ok(ahead)), Some(Ok(behind))) => Some(AheadBehind { ahead, behind }),
            _ => None,
        }
    }

    pub async fn merge_state(&self) -> Result<MergeState> {
        let current_branch = self.current_branch().await?;
        if !is_merge_in_progress(&self.git_dir).await {
            return Ok(MergeState::not_merging(current_branch));
        }

        let merging_branch = read_merging_branch(&self.git_dir).await;
        let status = self.read(&STATUS_ARGS).await?;
        let mut conflicts = Vec::new();
        for path in parse_unmerged_paths(&status) {
            conflicts.push(self.conflict(&path).await?);
        }

        Ok(MergeState {
            in_progress: true,
            current_branch,
            merging_branch,
            conflicts,
        })
    }

    /// Three-way contents and marker positions for one conflicted path.
    pub async fn conflict(&self, path: &Path) -> Result<Conflict> {
        let (base, ours, theirs) = tokio::join!(
            self.stage_content(1, path),
            self.stage_content(2, path),
            self.stage_content(3, path),
        );

        let markers = match tokio::fs::read(self.workdir.join(path)).await {
            Ok(bytes) => scan_conflict_markers(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                log::debug!("{} not in working tree: {e}", path.display());
                Vec::new()
            }
        };

        Ok(Conflict {
            path: path.to_path_buf(),
            ours: ours.unwrap_or_default(),
            theirs: theirs.unwrap_or_default(),
            base,
            markers,
        })
    }

    async fn stage_content(&self, stage: u8, path: &Path) -> Option<String> {
        let spec = format!(":{stage}:{}", path.to_string_lossy());
        self.read_optional(&["show", &spec]).await
    }

    pub async fn diff_file(&self, path: &Path, staged: bool) -> Result<String> {
        let path = path.to_string_lossy().into_owned();
        let mut args = vec!["diff"];
        if staged {
            args.push("--cached");
        }
        args.extend(["--", path.as_str()]);
        self.read(&args).await
    }

    pub async fn diff_commit(&self, hash: &str) -> Result<String> {
        self.read(&["show", "--patch", "--stat", hash]).await
    }

    pub async fn diff_stash(&self, index: usize) -> Result<String> {
        let name = stash_ref(index);
        self.read(&["stash", "show", "-p", &name]).await
    }

    /// Working-tree content of `path`, relative to the repository root.
    pub async fn read_file(&self, path: &Path) -> Result<String> {
        let full = self.workdir.join(path);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| WorkbenchError::file_read_failed(full, e))
    }

    /// Every read a view needs, issued concurrently.
    pub async fn refresh(&self) -> Result<RepositorySnapshot> {
        let (status, commits, branches, stashes, tags, remotes, merge_state) = tokio::try_join!(
            self.status(),
            self.log(self.log_limit),
            self.branches(),
            self.stashes(),
            self.tags(),
            self.remotes(),
            self.merge_state(),
        )?;
        Ok(RepositorySnapshot {
            status,
            commits,
            branches,
            stashes,
            tags,
            remotes,
            merge_state,
        })
    }

    // ---- index and working tree ----

    pub async fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        self.mutate_paths(&["add"], paths).await
    }

    pub async fn stage_all(&self) -> Result<()> {
        self.mutate(&["add", "-A"]).await.map(drop)
    }

    pub async fn unstage(&self, paths: &[PathBuf]) -> Result<()> {
        self.mutate_paths(&["reset", "-q", "HEAD"], paths).await
    }

    pub async fn unstage_all(&self) -> Result<()> {
        self.mutate(&["reset", "-q", "HEAD"]).await.map(drop)
    }

    /// Drop working-tree changes to tracked paths.
    pub async fn discard(&self, paths: &[PathBuf]) -> Result<()> {
        self.mutate_paths(&["checkout"], paths).await
    }

    pub async fn commit(&self, message: &str) -> Result<()> {
        self.mutate(&["commit", "-m", message]).await.map(drop)
    }

    /// Amend HEAD, keeping its message when `message` is `None`.
    pub async fn amend(&self, message: Option<&str>) -> Result<()> {
        match message {
            Some(message) => self.mutate(&["commit", "--amend", "-m", message]).await,
            None => self.mutate(&["commit", "--amend", "--no-edit"]).await,
        }
        .map(drop)
    }

    pub async fn reset(&self, target: &str, mode: ResetMode) -> Result<()> {
        self.mutate(&["reset", mode.as_flag(), target]).await.map(drop)
    }

    pub async fn cherry_pick(&self, hash: &str) -> Result<()> {
        self.mutate(&["cherry-pick", hash]).await.map(drop)
    }

    pub async fn revert(&self, hash: &str) -> Result<()> {
        self.mutate(&["revert", "--no-edit", hash]).await.map(drop)
    }

    // ---- branches ----

    pub async fn checkout_branch(&self, name: &str) -> Result<()> {
        self.mutate(&["checkout", name]).await.map(drop)
    }

    pub async fn create_branch(
        &self,
        name: &str,
        start_point: Option<&str>,
        checkout: bool,
    ) -> Result<()> {
        let mut args = if checkout {
            vec!["checkout", "-b", name]
        } else {
            vec!["branch", name]
        };
        args.extend(start_point);
        self.mutate(&args).await.map(drop)
    }

    pub async fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        let flag = if force { "-D" } else { "-d" };
        self.mutate(&["branch", flag, name]).await.map(drop)
    }

    pub async fn rename_branch(&self, old: &str, new: &str) -> Result<()> {
        self.mutate(&["branch", "-m", old, new]).await.map(drop)
    }

    pub async fn set_branch_description(&self, name: &str, description: &str) -> Result<()> {
        let key = format!("branch.{name}.description");
        self.mutate(&["config", &key, description]).await.map(drop)
    }

    // ---- merging ----

    /// Merge `branch` into the current branch. Conflicts are an outcome, not an error.
    pub async fn merge(&self, branch: &str) -> Result<MergeOutcome> {
        let output = self.run_mutation(&["merge", "--no-edit", branch]).await?;
        if output.success() {
            self.record(&output);
            return Ok(MergeOutcome::Merged);
        }
        if output.stdout.contains("CONFLICT") || output.stderr.contains("CONFLICT") {
            self.record_as(&output, true);
            log::info!("merge of {branch} stopped with conflicts");
            return Ok(MergeOutcome::Conflicted(self.merge_state().await?));
        }
        self.record(&output);
        log::warn!("{} failed: {}", output.command, output.failure_text());
        output.into_result().map(|_| MergeOutcome::Merged)
    }

    pub async fn abort_merge(&self) -> Result<()> {
        self.mutate(&["merge", "--abort"]).await.map(drop)
    }

    /// Conclude a merge whose conflicts are all staged.
    pub async fn commit_merge(&self) -> Result<()> {
        self.mutate(&["commit", "--no-edit"]).await.map(drop)
    }

    pub async fn resolve_conflict(&self, path: &Path, resolution: Resolution) -> Result<()> {
        let path_arg = path.to_string_lossy().into_owned();
        match resolution {
            Resolution::Ours => {
                self.mutate(&["checkout", "--ours", "--", &path_arg]).await?;
            }
            Resolution::Theirs => {
                self.mutate(&["checkout", "--theirs", "--", &path_arg]).await?;
            }
            Resolution::Content(content) => {
                let full = self.workdir.join(path);
                tokio::fs::write(&full, content)
                    .await
                    .map_err(|e| WorkbenchError::file_write_failed(full, e))?;
            }
        }
        self.mutate(&["add", "--", &path_arg]).await.map(drop)
    }

    // ---- network ----

    /// Push the current branch. With `set_upstream`, the remote (default `origin`) becomes
    /// its upstream.
    pub async fn push(
        &self,
        remote: Option<&str>,
        set_upstream: bool,
        progress: Option<ProgressCallback>,
    ) -> Result<()> {
        let mut args = vec!["push", "--progress"];
        if set_upstream {
            args.extend(["-u", remote.unwrap_or("origin"), "HEAD"]);
        } else {
            args.extend(remote);
        }
        self.mutate_streaming(&args, progress).await.map(drop)
    }

    pub async fn pull(&self, progress: Option<ProgressCallback>) -> Result<()> {
        self.mutate_streaming(&["pull", "--progress"], progress)
            .await
            .map(drop)
    }

    pub async fn fetch(&self, progress: Option<ProgressCallback>) -> Result<()> {
        self.mutate_streaming(&["fetch", "--all", "--prune", "--progress"], progress)
            .await
            .map(drop)
    }

    // ---- stashes ----

    pub async fn stash_save(&self, message: Option<&str>, include_untracked: bool) -> Result<()> {
        let mut args = vec!["stash", "push"];
        if include_untracked {
            args.push("--include-untracked");
        }
        if let Some(message) = message {
            args.extend(["-m", message]);
        }
        self.mutate(&args).await.map(drop)
    }

    pub async fn stash_apply(&self, index: usize) -> Result<()> {
        self.stash_op("apply", index).await
    }

    pub async fn stash_pop(&self, index: usize) -> Result<()> {
        self.stash_op("pop", index).await
    }

    pub async fn stash_drop(&self, index: usize) -> Result<()> {
        self.stash_op("drop", index).await
    }

    async fn stash_op(&self, op: &str, index: usize) -> Result<()> {
        let name = stash_ref(index);
        self.mutate(&["stash", op, &name]).await.map(drop)
    }

    // ---- tags ----

    /// Lightweight tag, or annotated when a message is given.
    pub async fn create_tag(
        &self,
        name: &str,
        target: Option<&str>,
        message: Option<&str>,
    ) -> Result<()> {
        let mut args = vec!["tag"];
        if let Some(message) = message {
            args.extend(["-a", name, "-m", message]);
        } else {
            args.push(name);
        }
        args.extend(target);
        self.mutate(&args).await.map(drop)
    }

    pub async fn delete_tag(&self, name: &str) -> Result<()> {
        self.mutate(&["tag", "-d", name]).await.map(drop)
    }

    pub async fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        let refspec = format!("refs/tags/{name}");
        self.mutate(&["push", remote, &refspec]).await.map(drop)
    }

    // ---- remotes ----

    pub async fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.mutate(&["remote", "add", name, url]).await.map(drop)
    }

    pub async fn remove_remote(&self, name: &str) -> Result<()> {
        self.mutate(&["remote", "remove", name]).await.map(drop)
    }

    pub async fn rename_remote(&self, old: &str, new: &str) -> Result<()> {
        self.mutate(&["remote", "rename", old, new]).await.map(drop)
    }

    pub async fn set_remote_url(&self, name: &str, url: &str) -> Result<()> {
        self.mutate(&["remote", "set-url", name, url]).await.map(drop)
    }
}

fn stash_ref(index: usize) -> String {
    format!("stash@{{{index}}}")
}
