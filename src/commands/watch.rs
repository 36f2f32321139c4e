use crate::core::{
    colors::format_ahead_behind,
    error::Result,
    git::RepositoryClient,
    print_info, print_warning,
    state::{MergePhase, RepositorySnapshot},
    watcher::ChangeWatcher,
};
use colored::*;
use std::time::Duration;
use tokio::sync::mpsc;

/// Print a one-line summary every time the repository settles after a change, until ctrl-c.
pub async fn execute_watch(client: &RepositoryClient, debounce: Duration) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<()>();
    let mut watcher = ChangeWatcher::new(client.workdir(), client.git_dir(), debounce);
    watcher.set_callback(move || {
        let _ = tx.send(());
    });

    if !watcher.start() {
        print_warning(&format!(
            "Live updates unavailable for {}",
            client.workdir().display()
        ));
        return Ok(());
    }

    print_info(&format!(
        "Watching {} (ctrl-c to stop)",
        client.workdir().display()
    ));
    print_summary(client).await;

    loop {
        tokio::select! {
            changed = rx.recv() => {
                if changed.is_none() {
                    break;
                }
                print_summary(client).await;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    watcher.stop();
    Ok(())
}

async fn print_summary(client: &RepositoryClient) {
    match client.refresh().await {
        Ok(snapshot) => {
            let branch = client
                .current_branch()
                .await
                .unwrap_or_else(|_| String::from("?"));
            let ahead_behind = client.ahead_behind().await.unwrap_or_default();
            println!(
                "{} {}{} {}",
                chrono::Local::now().format("%H:%M:%S").to_string().bright_black(),
                branch.blue(),
                format_ahead_behind(ahead_behind.ahead, ahead_behind.behind),
                summary_text(&snapshot)
            );
        }
        Err(e) => print_warning(&format!("Refresh failed: {e}")),
    }
}

fn summary_text(snapshot: &RepositorySnapshot) -> String {
    let status = &snapshot.status;
    let mut parts = vec![
        format!("{} staged", status.staged.len()),
        format!("{} unstaged", status.unstaged.len()),
        format!("{} untracked", status.untracked.len()),
    ];
    if !snapshot.stashes.is_empty() {
        parts.push(format!("{} stash(es)", snapshot.stashes.len()));
    }
    match snapshot.merge_state.phase() {
        MergePhase::NotMerging => {}
        MergePhase::Conflicted => {
            parts.push(format!("{} conflict(s)", snapshot.merge_state.conflicts.len()))
        }
        MergePhase::ReadyToCommit => parts.push("merge ready to commit".to_string()),
    }
    parts.join(", ")
}
