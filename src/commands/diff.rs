use crate::core::{error::Result, git::RepositoryClient, print_info};
use colored::*;
use std::path::PathBuf;

pub async fn execute_diff(client: &RepositoryClient, paths: &[PathBuf], staged: bool) -> Result<()> {
    if paths.is_empty() {
        print_info("No paths given.");
        return Ok(());
    }

    for (i, path) in paths.iter().enumerate() {
        if paths.len() > 1 {
            if i > 0 {
                println!();
            }
            print!("{}", "═══ ".bright_blue().bold());
            print!("{}", path.to_string_lossy().bright_blue().bold());
            println!("{}", " ═══".bright_blue().bold());
        }

        let diff = client.diff_file(path, staged).await?;
        if diff.trim().is_empty() {
            let which = if staged { "staged" } else { "unstaged" };
            println!("{}", format!("No {which} changes").bright_black());
            continue;
        }
        for line in diff.lines() {
            println!("{}", colorize_diff_line(line));
        }
    }

    Ok(())
}

fn colorize_diff_line(line: &str) -> ColoredString {
    if line.starts_with("+++") || line.starts_with("---") {
        line.white().bold()
    } else if line.starts_with('+') {
        line.green()
    } else if line.starts_with('-') {
        line.red()
    } else if line.starts_with("@@") {
        line.cyan()
    } else if line.starts_with("diff ") || line.starts_with("index ") {
        line.bright_black()
    } else {
        line.normal()
    }
}
