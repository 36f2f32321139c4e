//! Predicates for validating git-workbench command output.

#![allow(dead_code)]

use predicates::prelude::*;

pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

pub fn has_branch_info(branch: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("On branch {branch}"))
}

/// Section headers are printed as `<header>:`
pub fn has_section(header: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("{header}:"))
}

/// A status line: aligned description followed by the path.
pub fn has_status_line(description: &str, path: &str) -> impl Predicate<str> {
    predicates::str::is_match(format!(r"{description}:\s+{}", regex::escape(path)))
        .expect("valid status pattern")
}
