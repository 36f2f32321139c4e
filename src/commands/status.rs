use crate::core::{
    colors::{format_ahead_behind, format_file_status},
    error::Result,
    git::RepositoryClient,
    print_info, print_section_header,
    state::{FileEntry, MergePhase, MergeState},
};
use colored::*;

pub async fn execute_status(client: &RepositoryClient) -> Result<()> {
    let (status, branch, merge_state) = tokio::try_join!(
        client.status(),
        client.current_branch(),
        client.merge_state(),
    )?;
    let ahead_behind = client.ahead_behind().await.unwrap_or_default();

    println!(
        "{} {}{}",
        "On branch".white(),
        branch.blue(),
        format_ahead_behind(ahead_behind.ahead, ahead_behind.behind)
    );
    print_merge_banner(&merge_state);

    if status.is_clean() {
        print_info("Nothing to commit, working tree clean");
        return Ok(());
    }

    print_entries("Staged changes", &status.staged);
    print_entries("Unstaged changes", &status.unstaged);
    print_entries("Untracked files", &status.untracked);
    println!();

    Ok(())
}

fn print_entries(header: &str, entries: &[FileEntry]) {
    if entries.is_empty() {
        return;
    }
    print_section_header(header);
    for entry in entries {
        println!(
            "{}",
            format_file_status(entry.status, &entry.path.to_string_lossy())
        );
    }
}

pub(crate) fn print_merge_banner(merge_state: &MergeState) {
    let merging = merge_state
        .merging_branch
        .as_deref()
        .unwrap_or("another branch");
    match merge_state.phase() {
        MergePhase::NotMerging => {}
        MergePhase::Conflicted => println!(
            "{} {} {}",
            "Merging".yellow(),
            merging.blue(),
            format!(
                "({} conflicted file(s), fix and run `resolve`)",
                merge_state.conflicts.len()
            )
            .bright_black()
        ),
        MergePhase::ReadyToCommit => println!(
            "{} {} {}",
            "Merging".yellow(),
            merging.blue(),
            "(all conflicts resolved, run `commit` to conclude)".bright_black()
        ),
    }
}
