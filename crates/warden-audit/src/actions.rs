//! The action log: a ring buffer of recently dispatched commands.
//!
//! Distinct from the audit log — this covers *every* dispatched command, not
//! just shell-like ones, with its own (smaller) retention. Its purpose is
//! quick "what has the agent been doing" introspection, not durable audit.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use warden_core::Timestamp;

/// Default retention for the action log.
pub const DEFAULT_ACTION_CAPACITY: usize = 200;

/// One dispatched top-level command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    /// When the command was dispatched.
    pub timestamp: Timestamp,
    /// Fully-qualified command name (e.g. `"mouse.click"`).
    pub tool: String,
    /// Serialized parameters the command was dispatched with.
    pub parameters: Value,
    /// How long the dispatch took, in milliseconds.
    pub duration_ms: u64,
    /// Whether the dispatch succeeded.
    pub success: bool,
}

/// Bounded ring buffer of the most recent dispatched commands.
#[derive(Debug)]
pub struct ActionLog {
    records: Mutex<VecDeque<ActionRecord>>,
    capacity: usize,
}

impl ActionLog {
    /// Create a log with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ACTION_CAPACITY)
    }

    /// Create a log retaining at most `capacity` records.
    ///
    /// A zero capacity is clamped to 1 — the action log is introspection
    /// plumbing and must not fail construction of the control plane.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// Record one dispatched command, evicting oldest-first over capacity.
    pub fn record(&self, tool: impl Into<String>, parameters: Value, duration_ms: u64, success: bool) {
        let record = ActionRecord {
            timestamp: Timestamp::now(),
            tool: tool.into(),
            parameters,
            duration_ms,
            success,
        };
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        records.push_back(record);
        while records.len() > self.capacity {
            records.pop_front();
        }
    }

    /// Up to `n` most recent records, newest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<ActionRecord> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .rev()
            .take(n)
            .cloned()
            .collect()
    }

    /// Empty the buffer.
    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }

    /// Number of retained records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}
