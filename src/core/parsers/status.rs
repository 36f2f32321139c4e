//! Porcelain v1 status parsing.
//!
//! Each line is `XY path`: X is the index column, Y the worktree column. `??` marks an
//! untracked path; otherwise each non-blank column produces its own entry, so a single
//! line can land in both the staged and the unstaged view.

use crate::core::git_status::{is_unmerged_code, GitStatus};
use crate::core::state::{FileEntry, StatusSnapshot};
use std::path::PathBuf;

pub fn parse_status(output: &str) -> StatusSnapshot {
    let mut snapshot = StatusSnapshot::default();

    for line in output.lines() {
        let Some((x, y, path)) = split_status_line(line) else {
            continue;
        };

        if x == '?' && y == '?' {
            snapshot.untracked.push(FileEntry {
                path,
                status: GitStatus::Untracked,
                staged: false,
            });
            continue;
        }

        if x != '?' {
            if let Some(status) = GitStatus::from_porcelain_char(x) {
                snapshot.staged.push(FileEntry {
                    path: path.clone(),
                    status,
                    staged: true,
                });
            }
        }

        if y != '?' {
            if let Some(status) = GitStatus::from_porcelain_char(y) {
                snapshot.unstaged.push(FileEntry {
                    path,
                    status,
                    staged: false,
                });
            }
        }
    }

    snapshot
}

/// Paths of every line whose `XY` pair is one of the unmerged codes.
pub fn parse_unmerged_paths(output: &str) -> Vec<PathBuf> {
    output
        .lines()
        .filter_map(split_status_line)
        .filter(|(x, y, _)| is_unmerged_code(&format!("{x}{y}")))
        .map(|(_, _, path)| path)
        .collect()
}

fn split_status_line(line: &str) -> Option<(char, char, PathBuf)> {
    let mut chars = line.chars();
    let x = chars.next()?;
    let y = chars.next()?;
    if chars.next()? != ' ' {
        return None;
    }
    let raw = chars.as_str();
    if raw.is_empty() {
        return None;
    }

    // Renames and copies report `old -> new`; the entry tracks the new path.
    let raw = match raw.split_once(" -> ") {
        Some((_, new)) if matches!(x, 'R' | 'C') || matches!(y, 'R' | 'C') => new,
        _ => raw,
    };
    Some((x, y, PathBuf::from(unquote(raw))))
}

/// git wraps paths with unusual characters in double quotes and C-style escapes.
fn unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) else {
        return raw.to_string();
    };

    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 == bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        let octal = bytes
            .get(i + 1..i + 4)
            .filter(|digits| digits.iter().all(|d| (b'0'..=b'7').contains(d)));
        if let Some(digits) = octal {
            let value = digits
                .iter()
                .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
            out.push(u8::try_from(value).unwrap_or(b'?'));
            i += 4;
            continue;
        }

        out.push(match bytes[i + 1] {
            b'n' => b'\n',
            b't' => b'\t',
            b'r' => b'\r',
            other => other,
        });
        i += 2;
    }
    String::from_utf8_lossy(&out).into_owned()
}
