//! Listings for stashes, tags and remotes.

use crate::core::{error::Result, git::RepositoryClient, print_info, print_section_header};
use colored::*;

pub async fn execute_stashes(client: &RepositoryClient) -> Result<()> {
    let stashes = client.stashes().await?;
    if stashes.is_empty() {
        print_info("No stashes.");
        return Ok(());
    }

    print_section_header("Stashes");
    for stash in &stashes {
        println!(
            "  {} {} {}",
            stash.name.yellow(),
            format!("[{}]", stash.branch).blue(),
            stash.message.white()
        );
    }
    println!();
    Ok(())
}

pub async fn execute_tags(client: &RepositoryClient) -> Result<()> {
    let tags = client.tags().await?;
    if tags.is_empty() {
        print_info("No tags.");
        return Ok(());
    }

    print_section_header("Tags");
    for tag in &tags {
        let kind = if tag.is_annotated {
            "annotated".green()
        } else {
            "lightweight".bright_black()
        };
        println!(
            "  {} {} {} {}",
            tag.name.cyan(),
            tag.commit.yellow(),
            tag.date.bright_black(),
            kind
        );
        if let Some(message) = &tag.message {
            println!("      {}", message.white());
        }
    }
    println!();
    Ok(())
}

pub async fn execute_remotes(client: &RepositoryClient) -> Result<()> {
    let remotes = client.remotes().await?;
    if remotes.is_empty() {
        print_info("No remotes configured.");
        return Ok(());
    }

    print_section_header("Remotes");
    for remote in &remotes {
        println!("  {}", remote.name.blue());
        println!("      {} {}", "fetch:".bright_black(), remote.fetch_url.white());
        if remote.push_url != remote.fetch_url {
            println!("      {} {}", "push: ".bright_black(), remote.push_url.white());
        }
    }
    println!();
    Ok(())
}
