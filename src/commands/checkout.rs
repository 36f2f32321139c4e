use crate::core::{error::Result, git::RepositoryClient, print_success};

/// Switch to `branch`, creating it from HEAD first when `create` is set.
pub async fn execute_checkout(client: &RepositoryClient, branch: &str, create: bool) -> Result<()> {
    if create {
        client.create_branch(branch, None, true).await?;
        print_success(&format!("Switched to a new branch '{branch}'"));
    } else {
        client.checkout_branch(branch).await?;
        print_success(&format!("Switched to branch '{branch}'"));
    }
    Ok(())
}
