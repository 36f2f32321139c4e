use crate::core::{error::Result, git::RepositoryClient, print_success};
use std::path::PathBuf;

/// Stage `paths`, or everything when none are given.
pub async fn execute_add(client: &RepositoryClient, paths: &[PathBuf]) -> Result<()> {
    if paths.is_empty() {
        client.stage_all().await?;
        print_success("Staged all changes");
        return Ok(());
    }

    client.stage(paths).await?;
    print_success(&format!("Staged {} path(s)", paths.len()));
    Ok(())
}
