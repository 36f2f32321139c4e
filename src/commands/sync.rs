//! push, pull and fetch with git's progress lines streamed to the terminal.

use crate::core::{
    error::Result, git::RepositoryClient, print_progress, print_success, runner::ProgressCallback,
};

fn progress_printer() -> ProgressCallback {
    Box::new(|line: &str| print_progress(line))
}

pub async fn execute_push(
    client: &RepositoryClient,
    remote: Option<&str>,
    set_upstream: bool,
) -> Result<()> {
    client
        .push(remote, set_upstream, Some(progress_printer()))
        .await?;
    print_success("Push complete");
    Ok(())
}

pub async fn execute_pull(client: &RepositoryClient) -> Result<()> {
    client.pull(Some(progress_printer())).await?;
    print_success("Pull complete");
    Ok(())
}

pub async fn execute_fetch(client: &RepositoryClient) -> Result<()> {
    client.fetch(Some(progress_printer())).await?;
    print_success("Fetched all remotes");
    Ok(())
}
