use git_workbench::core::{
    config::EngineConfig,
    error::WorkbenchError,
    git::{RepositoryClient, Resolution},
    git_status::GitStatus,
    runner::ProgressCallback,
    state::{AheadBehind, MergeOutcome, MergePhase},
    watcher::ChangeWatcher,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

mod common;
use common::{fixtures::*, repository::*};

fn open(path: &Path) -> anyhow::Result<RepositoryClient> {
    Ok(RepositoryClient::open(path, &EngineConfig::default())?)
}

/// Progress callback that keeps every line it is handed.
fn collect_lines() -> (Arc<Mutex<Vec<String>>>, ProgressCallback) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let callback: ProgressCallback = Box::new(move |line: &str| {
        if let Ok(mut lines) = sink.lock() {
            lines.push(line.to_string());
        }
    });
    (lines, callback)
}

fn line_count(lines: &Arc<Mutex<Vec<String>>>) -> usize {
    lines.lock().map(|lines| lines.len()).unwrap_or(0)
}

fn paths(entries: &[git_workbench::FileEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.path.to_string_lossy().into_owned())
        .collect()
}

#[cfg(test)]
mod status_tests {
    use super::*;

    #[tokio::test]
    async fn test_status_splits_views() -> anyhow::Result<()> {
        let repo = create_mixed_status_repo()?;
        let client = open(repo.path())?;

        let status = client.status().await?;

        assert_eq!(paths(&status.staged), vec!["partial.txt", "staged.txt"]);
        assert_eq!(paths(&status.unstaged), vec!["partial.txt", "unstaged.txt"]);
        assert_eq!(paths(&status.untracked), vec!["untracked.txt"]);
        assert!(status.staged.iter().all(|e| e.staged));
        assert!(status.unstaged.iter().all(|e| !e.staged));
        assert_eq!(status.untracked[0].status, GitStatus::Untracked);
        Ok(())
    }

    #[tokio::test]
    async fn test_clean_repository() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;

        assert!(client.status().await?.is_clean());
        Ok(())
    }

    #[tokio::test]
    async fn test_open_from_subdirectory_finds_root() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(repo.path(), "nested/deep/file.txt", "x\n")?;

        let client = open(&repo.path().join("nested/deep"))?;

        assert_eq!(client.workdir().canonicalize()?, repo.path().to_path_buf());
        Ok(())
    }

    #[test]
    fn test_open_outside_repository() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let result = RepositoryClient::open(dir.path(), &EngineConfig::default());
        assert!(matches!(result, Err(WorkbenchError::NotInGitRepo)));
        Ok(())
    }

    #[tokio::test]
    async fn test_stage_and_unstage_round_trip() -> anyhow::Result<()> {
        let repo = create_mixed_status_repo()?;
        let client = open(repo.path())?;

        client.stage(&[PathBuf::from("unstaged.txt")]).await?;
        assert!(paths(&client.status().await?.staged).contains(&"unstaged.txt".to_string()));

        client.unstage_all().await?;
        let status = client.status().await?;
        assert!(status.staged.is_empty());
        assert_eq!(status.untracked.len(), 1);

        client.stage_all().await?;
        let status = client.status().await?;
        assert!(status.unstaged.is_empty());
        assert!(status.untracked.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_discard_restores_committed_content() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(repo.path(), "initial.txt", "scribbles\n")?;
        let client = open(repo.path())?;

        client.discard(&[PathBuf::from("initial.txt")]).await?;

        assert_eq!(read_file(repo.path(), "initial.txt")?, "initial content\n");
        Ok(())
    }
}

#[cfg(test)]
mod history_tests {
    use super::*;

    #[tokio::test]
    async fn test_log_newest_first() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        commit_file(repo.path(), "second.txt", "2\n", "Second commit")?;
        let client = open(repo.path())?;

        let commits = client.log(10).await?;

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].subject, "Second commit");
        assert_eq!(commits[1].subject, "Initial commit");
        assert_eq!(commits[0].author, "Test User");
        assert!(commits[0].hash.starts_with(&commits[0].short_hash));
        Ok(())
    }

    #[tokio::test]
    async fn test_log_respects_limit() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        commit_file(repo.path(), "a.txt", "a\n", "A")?;
        commit_file(repo.path(), "b.txt", "b\n", "B")?;
        let client = open(repo.path())?;

        assert_eq!(client.log(2).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_unborn_branch_has_empty_log() -> anyhow::Result<()> {
        let repo = setup_test_repo()?;
        let client = open(repo.path())?;

        assert!(client.log(10).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_commit_and_amend() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(repo.path(), "new.txt", "new\n")?;
        let client = open(repo.path())?;

        client.stage(&[PathBuf::from("new.txt")]).await?;
        client.commit("Add new file").await?;
        client.amend(Some("Add new file, reworded")).await?;

        let commits = client.log(5).await?;
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].subject, "Add new file, reworded");
        Ok(())
    }
}

#[cfg(test)]
mod replay_tests {
    use super::*;

    #[tokio::test]
    async fn test_cherry_pick_then_revert() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;

        client.create_branch("side", None, true).await?;
        commit_file(repo.path(), "side.txt", "side work\n", "Side work")?;
        let side = client.log(1).await?.remove(0);
        client.checkout_branch("main").await?;
        assert!(!repo.path().join("side.txt").exists());

        client.cherry_pick(&side.hash).await?;

        let commits = client.log(5).await?;
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].subject, "Side work");
        assert_ne!(commits[0].hash, side.hash);
        assert_eq!(read_file(repo.path(), "side.txt")?, "side work\n");

        client.revert(&commits[0].hash).await?;

        let commits = client.log(5).await?;
        assert_eq!(commits.len(), 3);
        assert_eq!(commits[0].subject, "Revert \"Side work\"");
        assert!(!repo.path().join("side.txt").exists());
        assert!(client.status().await?.is_clean());
        Ok(())
    }

    #[tokio::test]
    async fn test_diff_commit_shows_patch() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        commit_file(repo.path(), "notes.txt", "remember this\n", "Add notes")?;
        let client = open(repo.path())?;

        let head = client.log(1).await?.remove(0);
        let patch = client.diff_commit(&head.hash).await?;

        assert!(patch.contains("Add notes"));
        assert!(patch.contains("notes.txt"));
        assert!(patch.contains("+remember this"));
        Ok(())
    }

    #[tokio::test]
    async fn test_cherry_pick_unknown_commit_is_recorded_failure() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;

        let result = client.cherry_pick("0000000000000000000000000000000000000000").await;

        assert!(matches!(result, Err(WorkbenchError::CommandFailed { .. })));
        let activity = client.activity();
        assert!(activity[0].command.starts_with("git cherry-pick"));
        assert!(!activity[0].success);
        Ok(())
    }
}

#[cfg(test)]
mod refs_tests {
    use super::*;

    #[tokio::test]
    async fn test_branches_with_description() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;

        client.create_branch("feature/login", None, false).await?;
        client
            .set_branch_description("feature/login", "Login form")
            .await?;

        let branches = client.branches().await?;
        let main = branches.iter().find(|b| b.name == "main").expect("main");
        let feature = branches
            .iter()
            .find(|b| b.name == "feature/login")
            .expect("feature/login");

        assert!(main.is_current);
        assert!(!feature.is_current);
        assert!(!feature.is_remote);
        assert_eq!(feature.description.as_deref(), Some("Login form"));
        assert_eq!(main.description, None);
        assert_eq!(client.current_branch().await?, "main");
        assert_eq!(client.ahead_behind().await, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_rename_and_delete_branch() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;

        client.create_branch("topic", None, true).await?;
        assert_eq!(client.current_branch().await?, "topic");

        client.checkout_branch("main").await?;
        client.rename_branch("topic", "renamed").await?;
        client.delete_branch("renamed", false).await?;

        let names: Vec<String> = client.branches().await?.into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["main"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_tags_annotated_and_lightweight() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;

        client.create_tag("v1.0.0", None, Some("First release")).await?;
        client.create_tag("snapshot", None, None).await?;

        let tags = client.tags().await?;
        let release = tags.iter().find(|t| t.name == "v1.0.0").expect("v1.0.0");
        let snapshot = tags.iter().find(|t| t.name == "snapshot").expect("snapshot");

        assert!(release.is_annotated);
        assert_eq!(release.message.as_deref(), Some("First release"));
        assert!(!snapshot.is_annotated);
        assert_eq!(snapshot.message, None);
        // Annotated tags point at the commit, not the tag object.
        assert_eq!(release.commit, snapshot.commit);

        client.delete_tag("snapshot").await?;
        assert_eq!(client.tags().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_stash_save_list_and_pop() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(repo.path(), "initial.txt", "work in progress\n")?;
        let client = open(repo.path())?;

        client.stash_save(Some("halfway there"), false).await?;
        assert!(client.status().await?.is_clean());

        let stashes = client.stashes().await?;
        assert_eq!(stashes.len(), 1);
        assert_eq!(stashes[0].index, 0);
        assert_eq!(stashes[0].name, "stash@{0}");
        assert_eq!(stashes[0].branch, "main");
        assert_eq!(stashes[0].message, "halfway there");

        let patch = client.diff_stash(0).await?;
        assert!(patch.contains("+work in progress"));

        client.stash_pop(0).await?;
        assert!(client.stashes().await?.is_empty());
        assert_eq!(read_file(repo.path(), "initial.txt")?, "work in progress\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_stash_apply_and_drop_by_index() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;

        create_file(repo.path(), "initial.txt", "first draft\n")?;
        client.stash_save(Some("first"), false).await?;
        create_file(repo.path(), "initial.txt", "second draft\n")?;
        client.stash_save(Some("second"), false).await?;

        let stashes = client.stashes().await?;
        assert_eq!(stashes.len(), 2);
        assert_eq!(stashes[1].index, 1);
        assert_eq!(stashes[1].message, "first");

        client.stash_apply(1).await?;
        assert_eq!(read_file(repo.path(), "initial.txt")?, "first draft\n");
        assert_eq!(client.stashes().await?.len(), 2);

        client.discard(&[PathBuf::from("initial.txt")]).await?;
        client.stash_drop(1).await?;

        let stashes = client.stashes().await?;
        assert_eq!(stashes.len(), 1);
        assert_eq!(stashes[0].index, 0);
        assert_eq!(stashes[0].message, "second");
        Ok(())
    }

    #[tokio::test]
    async fn test_remotes_lifecycle() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;

        client
            .add_remote("origin", "https://example.com/repo.git")
            .await?;
        client.rename_remote("origin", "upstream").await?;
        client
            .set_remote_url("upstream", "https://example.com/moved.git")
            .await?;

        let remotes = client.remotes().await?;
        assert_eq!(remotes.len(), 1);
        assert_eq!(remotes[0].name, "upstream");
        assert_eq!(remotes[0].fetch_url, "https://example.com/moved.git");
        assert_eq!(remotes[0].push_url, "https://example.com/moved.git");

        client.remove_remote("upstream").await?;
        assert!(client.remotes().await?.is_empty());
        Ok(())
    }
}

#[cfg(test)]
mod merge_tests {
    use super::*;

    #[tokio::test]
    async fn test_conflicted_merge_is_an_outcome() -> anyhow::Result<()> {
        let repo = create_diverged_repo()?;
        let client = open(repo.path())?;

        let state = match client.merge("feature").await? {
            MergeOutcome::Conflicted(state) => state,
            MergeOutcome::Merged => anyhow::bail!("expected a conflict"),
        };

        assert!(state.in_progress);
        assert_eq!(state.current_branch, "main");
        assert_eq!(state.merging_branch.as_deref(), Some("feature"));
        assert_eq!(state.phase(), MergePhase::Conflicted);
        assert_eq!(state.conflicts.len(), 1);

        let conflict = &state.conflicts[0];
        assert_eq!(conflict.path, PathBuf::from("shared.txt"));
        assert_eq!(conflict.ours.trim_end(), SHARED_OURS.trim_end());
        assert_eq!(conflict.theirs.trim_end(), SHARED_THEIRS.trim_end());
        assert_eq!(
            conflict.base.as_deref().map(str::trim_end),
            Some(SHARED_BASE.trim_end())
        );

        // <<<<<<< HEAD / ours / ======= / theirs / >>>>>>> feature
        assert_eq!(conflict.markers.len(), 1);
        let marker = &conflict.markers[0];
        assert_eq!(marker.start_line, 1);
        assert_eq!((marker.ours.start, marker.ours.end), (2, 2));
        assert_eq!((marker.theirs.start, marker.theirs.end), (4, 4));
        assert_eq!(marker.end_line, 5);
        assert_eq!(marker.base, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_conflicted_merge_is_recorded_as_success() -> anyhow::Result<()> {
        let repo = create_diverged_repo()?;
        let client = open(repo.path())?;

        let outcome = client.merge("feature").await?;
        assert!(matches!(outcome, MergeOutcome::Conflicted(_)));

        let activity = client.activity();
        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].command, "git merge --no-edit feature");
        assert!(activity[0].success);
        assert_eq!(activity[0].error, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_then_commit_merge() -> anyhow::Result<()> {
        let repo = create_diverged_repo()?;
        let client = open(repo.path())?;
        client.merge("feature").await?;

        client
            .resolve_conflict(Path::new("shared.txt"), Resolution::Theirs)
            .await?;
        let state = client.merge_state().await?;
        assert_eq!(state.phase(), MergePhase::ReadyToCommit);

        client.commit_merge().await?;

        let state = client.merge_state().await?;
        assert_eq!(state.phase(), MergePhase::NotMerging);
        assert_eq!(read_file(repo.path(), "shared.txt")?, SHARED_THEIRS);
        assert!(client.status().await?.is_clean());
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_with_edited_content() -> anyhow::Result<()> {
        let repo = create_diverged_repo()?;
        let client = open(repo.path())?;
        client.merge("feature").await?;

        client
            .resolve_conflict(
                Path::new("shared.txt"),
                Resolution::Content("ours and theirs\n".to_string()),
            )
            .await?;

        assert_eq!(read_file(repo.path(), "shared.txt")?, "ours and theirs\n");
        assert!(client.merge_state().await?.conflicts.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_abort_merge_restores_ours() -> anyhow::Result<()> {
        let repo = create_diverged_repo()?;
        let client = open(repo.path())?;
        client.merge("feature").await?;

        client.abort_merge().await?;

        assert_eq!(client.merge_state().await?.phase(), MergePhase::NotMerging);
        assert_eq!(read_file(repo.path(), "shared.txt")?, SHARED_OURS);
        Ok(())
    }

    #[tokio::test]
    async fn test_clean_merge() -> anyhow::Result<()> {
        let repo = create_mergeable_repo()?;
        let client = open(repo.path())?;

        assert_eq!(client.merge("feature").await?, MergeOutcome::Merged);
        assert_eq!(read_file(repo.path(), "feature.txt")?, "feature work\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_merging_unknown_branch_is_an_error() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;

        let result = client.merge("no-such-branch").await;

        assert!(matches!(result, Err(WorkbenchError::CommandFailed { .. })));
        Ok(())
    }
}

#[cfg(test)]
mod activity_tests {
    use super::*;

    #[tokio::test]
    async fn test_mutations_are_recorded_most_recent_first() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;

        client.status().await?;
        client.create_branch("one", None, false).await?;
        let failed = client.checkout_branch("missing").await;
        assert!(failed.is_err());

        let activity = client.activity();
        assert_eq!(activity.len(), 2);
        assert_eq!(activity[0].command, "git checkout missing");
        assert!(!activity[0].success);
        assert!(activity[0].error.is_some());
        assert_eq!(activity[1].command, "git branch one");
        assert!(activity[1].success);
        assert_eq!(activity[1].error, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_gathers_everything() -> anyhow::Result<()> {
        let repo = create_mixed_status_repo()?;
        let client = open(repo.path())?;

        let snapshot = client.refresh().await?;

        assert_eq!(snapshot.commits.len(), 1);
        assert_eq!(snapshot.branches.len(), 1);
        assert!(snapshot.stashes.is_empty());
        assert!(snapshot.tags.is_empty());
        assert!(snapshot.remotes.is_empty());
        assert_eq!(snapshot.status.untracked.len(), 1);
        assert_eq!(snapshot.merge_state.phase(), MergePhase::NotMerging);
        Ok(())
    }
}

#[cfg(test)]
mod network_tests {
    use super::*;

    /// Bare repository on `main` to act as `origin`.
    fn bare_remote() -> anyhow::Result<TempDir> {
        let dir = TempDir::new()?;
        git(dir.path(), &["init", "--bare", "-q"])?;
        git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"])?;
        Ok(dir)
    }

    fn remote_url(remote: &TempDir) -> anyhow::Result<String> {
        Ok(remote.path().canonicalize()?.to_string_lossy().into_owned())
    }

    /// Second clone of `remote` that pushes one more commit to `main`.
    fn push_from_other_clone(remote: &TempDir) -> anyhow::Result<TempDir> {
        let other = TempDir::new()?;
        git(other.path(), &["clone", "-q", &remote_url(remote)?, "."])?;
        git(other.path(), &["config", "user.name", "Other User"])?;
        git(other.path(), &["config", "user.email", "other@example.com"])?;
        git(other.path(), &["config", "commit.gpgsign", "false"])?;
        commit_file(other.path(), "upstream.txt", "from elsewhere\n", "Upstream change")?;
        git(other.path(), &["push", "-q", "origin", "main"])?;
        Ok(other)
    }

    #[tokio::test]
    async fn test_push_sets_upstream_and_streams_progress() -> anyhow::Result<()> {
        let remote = bare_remote()?;
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;
        client.add_remote("origin", &remote_url(&remote)?).await?;

        let (lines, progress) = collect_lines();
        client.push(Some("origin"), true, Some(progress)).await?;

        assert!(line_count(&lines) > 0);
        assert_eq!(
            client.ahead_behind().await,
            Some(AheadBehind { ahead: 0, behind: 0 })
        );
        let pushed = git(remote.path(), &["log", "--format=%s", "main"])?;
        assert_eq!(pushed.trim(), "Initial commit");
        Ok(())
    }

    #[tokio::test]
    async fn test_push_tag() -> anyhow::Result<()> {
        let remote = bare_remote()?;
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;
        client.add_remote("origin", &remote_url(&remote)?).await?;
        client.create_tag("v0.1.0", None, Some("First cut")).await?;

        client.push_tag("origin", "v0.1.0").await?;

        let tags = git(remote.path(), &["tag", "-l"])?;
        assert_eq!(tags.trim(), "v0.1.0");
        assert!(client.activity()[0].success);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_then_pull_streams_progress() -> anyhow::Result<()> {
        let remote = bare_remote()?;
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;
        client.add_remote("origin", &remote_url(&remote)?).await?;
        client.push(Some("origin"), true, None).await?;
        let _other = push_from_other_clone(&remote)?;

        let (fetched, progress) = collect_lines();
        client.fetch(Some(progress)).await?;
        assert!(line_count(&fetched) > 0);
        assert_eq!(
            client.ahead_behind().await,
            Some(AheadBehind { ahead: 0, behind: 1 })
        );

        let (pulled, progress) = collect_lines();
        client.pull(Some(progress)).await?;
        assert!(line_count(&pulled) > 0);
        assert_eq!(read_file(repo.path(), "upstream.txt")?, "from elsewhere\n");
        assert_eq!(client.log(1).await?[0].subject, "Upstream change");

        let commands: Vec<String> = client.activity().into_iter().map(|r| r.command).collect();
        assert_eq!(commands[0], "git pull --progress");
        assert_eq!(commands[1], "git fetch --all --prune --progress");
        Ok(())
    }

    #[tokio::test]
    async fn test_push_without_remote_fails() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let client = open(repo.path())?;

        let (_, progress) = collect_lines();
        let result = client.push(Some("nowhere"), false, Some(progress)).await;

        assert!(matches!(result, Err(WorkbenchError::CommandFailed { .. })));
        assert!(!client.activity()[0].success);
        Ok(())
    }
}

#[cfg(test)]
mod watcher_tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(200);
    const SETTLE: Duration = Duration::from_millis(1000);

    fn counting_watcher(client: &RepositoryClient) -> (ChangeWatcher, Arc<AtomicUsize>) {
        let watcher = ChangeWatcher::new(client.workdir(), client.git_dir(), DEBOUNCE);
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        watcher.set_callback(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (watcher, count)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_real_watcher_debounces_filters_and_stops() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(repo.path(), ".hidden/keep.txt", "x\n")?;
        create_file(repo.path(), "node_modules/pkg/index.js", "x\n")?;
        let client = open(repo.path())?;
        let (mut watcher, count) = counting_watcher(&client);

        assert!(watcher.start());
        assert!(watcher.is_running());
        tokio::time::sleep(Duration::from_millis(100)).await;

        for i in 0..5 {
            create_file(repo.path(), "initial.txt", &format!("edit {i}\n"))?;
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        tokio::time::sleep(SETTLE).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        create_file(repo.path(), ".hidden/keep.txt", "changed\n")?;
        create_file(repo.path(), "node_modules/pkg/index.js", "changed\n")?;
        tokio::time::sleep(SETTLE).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        git_add(repo.path(), "initial.txt")?;
        tokio::time::sleep(SETTLE).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        watcher.stop();
        assert!(!watcher.is_running());
        create_file(repo.path(), "initial.txt", "after stop\n")?;
        tokio::time::sleep(SETTLE).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        Ok(())
    }
}
