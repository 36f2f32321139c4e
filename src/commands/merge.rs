use crate::commands::status::print_merge_banner;
use crate::core::{
    error::{Result, WorkbenchError},
    git::{RepositoryClient, Resolution},
    print_info, print_section_header, print_success, print_warning,
    state::{Conflict, MergeOutcome, MergePhase},
};
use colored::*;
use std::path::Path;

pub async fn execute_merge(client: &RepositoryClient, branch: &str) -> Result<()> {
    match client.merge(branch).await? {
        MergeOutcome::Merged => {
            print_success(&format!("Merged '{branch}'"));
        }
        MergeOutcome::Conflicted(state) => {
            print_warning(&format!(
                "Merge of '{branch}' stopped with {} conflicted file(s)",
                state.conflicts.len()
            ));
            print_conflicts(&state.conflicts);
        }
    }
    Ok(())
}

pub async fn execute_conflicts(client: &RepositoryClient) -> Result<()> {
    let state = client.merge_state().await?;
    if state.phase() == MergePhase::NotMerging {
        print_info("No merge in progress.");
        return Ok(());
    }

    print_merge_banner(&state);
    if state.conflicts.is_empty() {
        return Ok(());
    }
    print_conflicts(&state.conflicts);
    Ok(())
}

pub async fn execute_resolve(
    client: &RepositoryClient,
    path: &Path,
    ours: bool,
    theirs: bool,
) -> Result<()> {
    let resolution = match (ours, theirs) {
        (true, false) => Resolution::Ours,
        (false, true) => Resolution::Theirs,
        _ => {
            return Err(WorkbenchError::invalid_argument(
                "Pick exactly one of --ours or --theirs",
            ))
        }
    };

    client.resolve_conflict(path, resolution).await?;
    print_success(&format!("Resolved {}", path.display()));

    let remaining = client.merge_state().await?;
    if remaining.phase() == MergePhase::ReadyToCommit {
        print_info("All conflicts resolved. Run `commit` to conclude the merge.");
    }
    Ok(())
}

pub async fn execute_abort_merge(client: &RepositoryClient) -> Result<()> {
    client.abort_merge().await?;
    print_success("Merge aborted");
    Ok(())
}

fn print_conflicts(conflicts: &[Conflict]) {
    print_section_header("Conflicted files");
    for conflict in conflicts {
        let blocks = conflict.markers.len();
        let lines = conflict
            .markers
            .iter()
            .map(|m| format!("{}-{}", m.start_line, m.end_line))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {} {}",
            conflict.path.to_string_lossy().red().bold(),
            format!("({blocks} block(s) at lines {lines})").bright_black()
        );
    }
    println!();
}
