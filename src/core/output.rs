//! Terminal output helpers shared by every command.
//!
//! All command output is framed the same way: a blank line before, the message, and for
//! informational blocks a blank line after. Errors go to stderr so piping `log` or `diff`
//! output stays clean.

use colored::*;

/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    eprintln!("\n{} {}\n", "✕ Error:".red(), message.white());
}

pub fn print_warning(message: &str) {
    eprintln!("\n{} {}", "!".yellow(), message.white());
}

/// ```text
///
/// ✓ <message>
/// ```
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// ```text
///
/// <header>:
///
/// ```
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// One line of streamed push/pull/fetch output.
pub fn print_progress(line: &str) {
    println!("  {}", line.bright_black());
}
