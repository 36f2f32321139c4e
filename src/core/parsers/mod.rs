//! Pure parsers from git's textual output to typed state.
//!
//! Every parser is total: malformed lines are either skipped or returned as
//! [`ParseOutcome::Recovered`](crate::core::state::ParseOutcome) records, never errors.

pub mod branch;
pub mod log;
pub mod remote;
pub mod stash;
pub mod status;
pub mod tag;

pub use branch::{parse_branches, BRANCH_FORMAT};
pub use self::log::{parse_log, LOG_FORMAT};
pub use remote::parse_remotes;
pub use stash::parse_stashes;
pub use status::{parse_status, parse_unmerged_paths};
pub use tag::{parse_tags, TAG_FORMAT};
