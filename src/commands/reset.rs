use crate::core::{error::Result, git::RepositoryClient, print_success};
use std::path::PathBuf;

/// Unstage `paths`, or the whole index when none are given. The working tree is untouched.
pub async fn execute_reset(client: &RepositoryClient, paths: &[PathBuf]) -> Result<()> {
    if paths.is_empty() {
        client.unstage_all().await?;
        print_success("Unstaged all changes");
        return Ok(());
    }

    client.unstage(paths).await?;
    print_success(&format!("Unstaged {} path(s)", paths.len()));
    Ok(())
}
