//! `git remote -v` parsing.

use crate::core::state::Remote;

pub fn parse_remotes(output: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();

    for line in output.lines() {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(url)) = (parts.next(), parts.next()) else {
            continue;
        };
        let kind = parts.next().unwrap_or("(fetch)");

        let index = match remotes.iter().position(|r| r.name == name) {
            Some(index) => index,
            None => {
                remotes.push(Remote {
                    name: name.to_string(),
                    fetch_url: String::new(),
                    push_url: String::new(),
                });
                remotes.len() - 1
            }
        };

        let remote = &mut remotes[index];
        match kind {
            "(push)" => remote.push_url = url.to_string(),
            _ => remote.fetch_url = url.to_string(),
        }
    }

    remotes
}
