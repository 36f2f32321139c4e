//! Bounded history of the git commands a client has run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

pub const DEFAULT_ACTIVITY_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub command: String,
    pub timestamp: DateTime<Utc>,
    pub duration: Duration,
    pub success: bool,
    pub error: Option<String>,
}

/// Most-recent-first ring of [`CommandRecord`]s. Pushing past capacity evicts the oldest.
#[derive(Debug, Clone)]
pub struct ActivityLedger {
    entries: VecDeque<CommandRecord>,
    capacity: usize,
}

impl Default for ActivityLedger {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ACTIVITY_CAPACITY)
    }
}

impl ActivityLedger {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(
        &mut self,
        command: impl Into<String>,
        duration: Duration,
        success: bool,
        error: Option<String>,
    ) {
        self.push(CommandRecord {
            command: command.into(),
            timestamp: Utc::now(),
            duration,
            success,
            error,
        });
    }

    pub fn push(&mut self, record: CommandRecord) {
        self.entries.push_front(record);
        self.entries.truncate(self.capacity);
    }

    /// Snapshot of the ledger, most recent first.
    pub fn list(&self) -> Vec<CommandRecord> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
