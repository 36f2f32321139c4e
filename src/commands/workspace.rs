//! Recent repositories and named sessions, persisted in `workspace.json`.

use crate::core::{
    error::{Result, WorkbenchError},
    print_info, print_section_header, print_success,
    workspace::{Repository, WorkspaceSession, WorkspaceStore},
};
use colored::*;
use std::path::{Path, PathBuf};

pub async fn execute_workspace_add(store: &WorkspaceStore, path: &Path) -> Result<()> {
    let repository = store.add_repository(absolute(path)).await?;
    print_success(&format!(
        "Added {} to recent repositories",
        repository.path.display()
    ));
    Ok(())
}

pub async fn execute_workspace_recent(store: &WorkspaceStore) -> Result<()> {
    let recent = store.recent_repositories().await;
    if recent.is_empty() {
        print_info("No recent repositories.");
        return Ok(());
    }

    print_section_header("Recent Repositories");
    for (i, repository) in recent.iter().enumerate() {
        println!(
            "{}{}{} {} {}",
            "[".bright_black(),
            (i + 1).to_string().white(),
            "]".bright_black(),
            repository.name.blue(),
            repository.path.display().to_string().bright_black()
        );
    }
    println!();
    Ok(())
}

pub async fn execute_workspace_sessions(store: &WorkspaceStore) -> Result<()> {
    let sessions = store.sessions().await;
    if sessions.is_empty() {
        print_info("No sessions. Create one with `workspace create <name>`.");
        return Ok(());
    }

    let active_id = store.active_session().await.map(|s| s.id);
    print_section_header("Sessions");
    for session in &sessions {
        let marker = if active_id.as_deref() == Some(session.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{}{}{} {} {} {}",
            "[".bright_black(),
            marker.white(),
            "]".bright_black(),
            session.name.blue(),
            format!("({} repositories)", session.repositories.len()).bright_black(),
            session.id.bright_black()
        );
        for repository in &session.repositories {
            let active = session.active_repository_id.as_deref() == Some(repository.id.as_str());
            let name = if active {
                repository.name.white().bold()
            } else {
                repository.name.white()
            };
            println!("      {} {}", name, repository.path.display().to_string().bright_black());
        }
    }
    println!();
    Ok(())
}

pub async fn execute_workspace_create(
    store: &WorkspaceStore,
    name: &str,
    paths: &[PathBuf],
) -> Result<()> {
    let repositories = paths
        .iter()
        .map(|p| Repository::from_path(absolute(p)))
        .collect();
    let session = store.create_session(name, repositories).await?;
    print_success(&format!("Created session '{}' ({})", session.name, session.id));
    Ok(())
}

pub async fn execute_workspace_delete(store: &WorkspaceStore, session: &str) -> Result<()> {
    let found = find_session(store, session).await?;
    store.delete_session(&found.id).await?;
    print_success(&format!("Deleted session '{}'", found.name));
    Ok(())
}

pub async fn execute_workspace_use(store: &WorkspaceStore, session: &str) -> Result<()> {
    let found = find_session(store, session).await?;
    store.set_active_session(Some(&found.id)).await?;
    print_success(&format!("Active session is now '{}'", found.name));
    Ok(())
}

/// Sessions are addressed by id or, failing that, by exact name.
async fn find_session(store: &WorkspaceStore, key: &str) -> Result<WorkspaceSession> {
    if let Some(session) = store.get_session(key).await {
        return Ok(session);
    }
    store
        .sessions()
        .await
        .into_iter()
        .find(|s| s.name == key)
        .ok_or_else(|| WorkbenchError::session_not_found(key))
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
