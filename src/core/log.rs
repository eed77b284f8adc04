//! Per-operation narration.
//!
//! Every mutating engine call rewrites its [`OperationLog`] with an ordered
//! sequence of human-readable descriptions of what the operation did
//! ("32 < 50 → descend left", "left-right case → double rotation", …).
//! The log is a display byproduct for the presentation layer, not a
//! programmatic interface: its strings carry no stability guarantee.

use serde::{Deserialize, Serialize};

/// Ordered, human-readable record of the most recent mutating operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLog {
    entries: Vec<String>,
}

impl OperationLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Starts a new operation: discards the previous entries and records the
    /// operation headline.
    pub fn begin(&mut self, headline: impl Into<String>) {
        self.entries.clear();
        self.entries.push(headline.into());
    }

    /// Appends a step description to the current operation.
    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    /// The entries of the most recent operation, in order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded since creation or the last clear.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discards all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
