//! Tag listing parsing.
//!
//! The format peels annotated tags so the commit column always names a commit, and
//! appends the object type last so lightweight and annotated tags can be told apart.

use crate::core::state::{ParseOutcome, Tag};

pub const TAG_FORMAT: &str = "--format=%(refname:short)|%(if)%(*objectname)%(then)%(*objectname:short)%(else)%(objectname:short)%(end)|%(creatordate:short)|%(contents:subject)|%(objecttype)";

pub fn parse_tags(output: &str) -> Vec<ParseOutcome<Tag>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_tag_line)
        .collect()
}

fn parse_tag_line(line: &str) -> ParseOutcome<Tag> {
    let mut head = line.splitn(4, '|');
    let name = head.next().unwrap_or_default().trim().to_string();
    let commit = head.next().unwrap_or_default().trim().to_string();
    let date = head.next().unwrap_or_default().trim().to_string();
    let rest = head.next();

    // Subjects may contain pipes; the object type never does.
    let Some((subject, object_type)) = rest.and_then(|r| r.rsplit_once('|')) else {
        return ParseOutcome::Recovered(Tag {
            name,
            commit,
            date,
            message: None,
            is_annotated: false,
        });
    };

    let is_annotated = object_type.trim() == "tag";
    let subject = subject.trim();
    let message = (is_annotated && !subject.is_empty()).then(|| subject.to_string());

    ParseOutcome::Parsed(Tag {
        name,
        commit,
        date,
        message,
        is_annotated,
    })
}
