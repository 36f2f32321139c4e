use crate::core::{
    error::{Result, WorkbenchError},
    git::RepositoryClient,
    print_success,
};

pub async fn execute_commit(
    client: &RepositoryClient,
    message: Option<&str>,
    amend: bool,
) -> Result<()> {
    if amend {
        client.amend(message).await?;
        print_success("Amended last commit");
        return Ok(());
    }

    let message = message
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| WorkbenchError::invalid_argument("A commit message is required (-m)"))?;
    client.commit(message).await?;
    print_success("Committed staged changes");
    Ok(())
}
