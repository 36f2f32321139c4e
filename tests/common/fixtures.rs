//! Predefined repository scenarios shared by the client and CLI tests.

#![allow(dead_code)]

use super::repository::*;
use git_workbench::core::error::Result;

/// Content every branch starts from in [`create_diverged_repo`]
pub const SHARED_BASE: &str = "line\n";
pub const SHARED_OURS: &str = "ours\n";
pub const SHARED_THEIRS: &str = "theirs\n";

/// Scenario: one file of each kind.
///
/// - `staged.txt`: modified and staged
/// - `partial.txt`: staged change plus a further unstaged edit
/// - `unstaged.txt`: modified, not staged
/// - `untracked.txt`: new, never added
pub fn create_mixed_status_repo() -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    create_test_files(&repo.path, &["staged.txt", "partial.txt", "unstaged.txt"])?;
    git_add(&repo.path, ".")?;
    git_commit(&repo.path, "Initial commit")?;

    modify_test_files(&repo.path, &["staged.txt", "partial.txt", "unstaged.txt"])?;
    git_add(&repo.path, "staged.txt")?;
    git_add(&repo.path, "partial.txt")?;
    create_file(&repo.path, "partial.txt", "edited again\n")?;
    create_file(&repo.path, "untracked.txt", "brand new\n")?;

    Ok(repo)
}

/// Scenario: `main` and `feature` both rewrote `shared.txt`, so merging `feature` into
/// `main` conflicts. `main` is checked out.
pub fn create_diverged_repo() -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    commit_file(&repo.path, "shared.txt", SHARED_BASE, "Add shared file")?;

    git_checkout(&repo.path, &["-b", "feature"])?;
    commit_file(&repo.path, "shared.txt", SHARED_THEIRS, "Theirs")?;

    git_checkout(&repo.path, &["main"])?;
    commit_file(&repo.path, "shared.txt", SHARED_OURS, "Ours")?;

    Ok(repo)
}

/// Scenario: `feature` adds a file `main` never touched, so the merge is clean.
pub fn create_mergeable_repo() -> Result<TestRepo> {
    let repo = setup_test_repo_with_initial_commit()?;

    git_checkout(&repo.path, &["-b", "feature"])?;
    commit_file(&repo.path, "feature.txt", "feature work\n", "Add feature")?;
    git_checkout(&repo.path, &["main"])?;

    Ok(repo)
}
