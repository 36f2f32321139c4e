//! Colour scheme for status codes, branches and the activity ledger.
//!
//! Every place that prints a [`GitStatus`] goes through [`get_status_color_style`], so a
//! status reads the same in the status listing, conflict listing and diff headers.
//!
//! # Color Scheme
//! - **Modified**: yellow
//! - **Added**: green
//! - **Deleted**: red
//! - **Renamed/Copied**: blue
//! - **Untracked**: cyan
//! - **Unmerged**: red bold

use crate::core::git_status::GitStatus;
use colored::*;

/// Colour function for a status; apply it to any text shown alongside that status.
pub fn get_status_color_style(status: GitStatus) -> Box<dyn Fn(&str) -> ColoredString> {
    match status {
        GitStatus::Modified => Box::new(|text: &str| text.yellow()),
        GitStatus::Untracked => Box::new(|text: &str| text.cyan()),
        GitStatus::Deleted => Box::new(|text: &str| text.red()),
        GitStatus::Added => Box::new(|text: &str| text.green()),
        GitStatus::Renamed | GitStatus::Copied => Box::new(|text: &str| text.blue()),
        GitStatus::TypeChanged => Box::new(|text: &str| text.magenta()),
        GitStatus::Unmerged => Box::new(|text: &str| text.red().bold()),
        GitStatus::Other(_) => Box::new(|text: &str| text.normal()),
    }
}

/// Status code followed by its description, padded so paths line up.
pub fn get_aligned_status(status: GitStatus) -> ColoredString {
    let color_fn = get_status_color_style(status);
    color_fn(&format!("{:<12}", format!("{}:", status.description())))
}

pub fn get_colored_path(status: GitStatus, path: &str) -> ColoredString {
    get_status_color_style(status)(path)
}

/// One status line: `  modified:   src/main.rs`
pub fn format_file_status(status: GitStatus, path: &str) -> String {
    format!(
        "  {}{}",
        get_aligned_status(status),
        get_colored_path(status, path)
    )
}

/// Ahead/behind suffix for a branch line, empty when in sync.
pub fn format_ahead_behind(ahead: usize, behind: usize) -> String {
    let counts = match (ahead, behind) {
        (0, 0) => return String::new(),
        (a, 0) => format!("+{a}"),
        (0, b) => format!("-{b}"),
        (a, b) => format!("+{a}/-{b}"),
    };
    format!(" {}{}{}", "(".bright_black(), counts.white(), ")".bright_black())
}

/// `✓`/`✕` marker for an activity record.
pub fn success_marker(success: bool) -> ColoredString {
    if success {
        "✓".green()
    } else {
        "✕".red()
    }
}
