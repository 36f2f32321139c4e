use crate::core::{
    activity::CommandRecord,
    clipboard::copy_to_clipboard,
    colors::success_marker,
    error::{Result, WorkbenchError},
    git::RepositoryClient,
    print_info, print_success, print_warning,
    state::Commit,
};
use colored::*;

/// List recent commits, or copy the hash of the 1-based `copy` entry.
pub async fn execute_log(
    client: &RepositoryClient,
    limit: usize,
    copy: Option<usize>,
) -> Result<()> {
    let commits = client.log(limit).await?;

    if commits.is_empty() {
        print_info("No commits yet.");
        return Ok(());
    }

    if let Some(index) = copy {
        return copy_commit_hash(&commits, index).await;
    }

    for (i, commit) in commits.iter().enumerate() {
        println!(
            "{}{}{} {} {} {} {}",
            "[".bright_black(),
            (i + 1).to_string().white(),
            "]".bright_black(),
            commit.short_hash.yellow(),
            commit.subject.white(),
            format!("({})", commit.date).bright_black(),
            commit.author.cyan()
        );
    }

    Ok(())
}

async fn copy_commit_hash(commits: &[Commit], index: usize) -> Result<()> {
    let commit = index
        .checked_sub(1)
        .and_then(|i| commits.get(i))
        .ok_or_else(|| {
            WorkbenchError::invalid_argument(format!(
                "Commit index {index} out of range (1-{})",
                commits.len()
            ))
        })?;

    // Clipboard trouble is reported, never fatal.
    match copy_to_clipboard(&commit.hash).await {
        Ok(()) => print_success(&format!("Copied {} to clipboard", commit.short_hash)),
        Err(e) => {
            print_warning(&e.to_string());
            println!("{}", commit.hash);
        }
    }
    Ok(())
}

/// The commands this invocation ran, most recent first. Written to stderr.
pub fn print_activity(records: &[CommandRecord]) {
    if records.is_empty() {
        return;
    }
    eprintln!("\n{}", "Activity:".white());
    for record in records {
        eprintln!(
            "  {} {} {}",
            success_marker(record.success),
            record.command.white(),
            format!("{}ms", record.duration.as_millis()).bright_black()
        );
        if let Some(error) = &record.error {
            eprintln!("      {}", error.red());
        }
    }
}
