use crate::core::{
    colors::format_ahead_behind, error::Result, git::RepositoryClient, print_info,
    print_section_header, state::Branch,
};
use colored::*;

pub async fn execute_branches(client: &RepositoryClient) -> Result<()> {
    let branches = client.branches().await?;

    if branches.is_empty() {
        print_info("No branches found. Make your first commit to create one.");
        return Ok(());
    }

    let (remote, local): (Vec<&Branch>, Vec<&Branch>) =
        branches.iter().partition(|b| b.is_remote);

    // Only the checked-out branch has a cheap ahead/behind.
    let ahead_behind = client
        .ahead_behind()
        .await
        .map(|ab| format_ahead_behind(ab.ahead, ab.behind))
        .unwrap_or_default();

    if !local.is_empty() {
        print_section_header("Local Branches");
        for branch in &local {
            let suffix = if branch.is_current {
                ahead_behind.as_str()
            } else {
                ""
            };
            println!("{}{}", format_branch_line(branch), suffix);
            if let Some(description) = &branch.description {
                println!("      {}", description.bright_black().italic());
            }
        }
    }

    if !remote.is_empty() {
        print_section_header("Remote Branches");
        for branch in &remote {
            println!("{}", format_branch_line(branch));
        }
    }
    println!();

    Ok(())
}

fn format_branch_line(branch: &Branch) -> String {
    let marker = if branch.is_current { "*" } else { " " };
    let name = if branch.is_current {
        branch.name.blue().bold()
    } else if branch.is_remote {
        branch.name.red()
    } else {
        branch.name.white()
    };

    let mut line = format!(
        "{}{}{} {}",
        "[".bright_black(),
        marker.white(),
        "]".bright_black(),
        name
    );
    if let Some(upstream) = &branch.upstream {
        line.push_str(&format!(" {}", format!("-> {upstream}").cyan()));
    }
    if let Some(date) = &branch.last_commit_date {
        line.push_str(&format!(" {}", format!("({date})").bright_black()));
    }
    line
}
