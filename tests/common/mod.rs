//! Shared integration test utilities for git-workbench.
//!
//! Tests run against real git repositories in temporary directories.

pub mod assertions;
pub mod fixtures;
pub mod repository;
