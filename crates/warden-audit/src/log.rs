//! The bounded audit log of executed operations.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use warden_core::Timestamp;

use crate::error::{AuditError, AuditResult};

/// One completed (or failed) audited operation.
///
/// Appended once, never mutated, evicted only by capacity pressure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation completed.
    pub timestamp: Timestamp,
    /// Category of the operation (e.g. `"shell"`).
    pub category: String,
    /// Action within the category (e.g. `"run"`).
    pub action: String,
    /// Free-text detail (e.g. the command line).
    pub detail: String,
    /// How long the operation took, in milliseconds.
    pub duration_ms: u64,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error text when the operation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEntry {
    /// Create a success entry.
    #[must_use]
    pub fn success(
        category: impl Into<String>,
        action: impl Into<String>,
        detail: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            timestamp: Timestamp::now(),
            category: category.into(),
            action: action.into(),
            detail: detail.into(),
            duration_ms,
            success: true,
            error: None,
        }
    }

    /// Create a failure entry carrying the error text.
    #[must_use]
    pub fn failure(
        category: impl Into<String>,
        action: impl Into<String>,
        detail: impl Into<String>,
        duration_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Timestamp::now(),
            category: category.into(),
            action: action.into(),
            detail: detail.into(),
            duration_ms,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Append-only, bounded, thread-safe record of executed operations.
///
/// Eviction and insertion happen under one short critical section, so a storm
/// of concurrent writers can neither lose entries nor double-count. The size
/// counter is kept in an atomic so `len()` never takes the lock.
#[derive(Debug)]
pub struct AuditLog {
    entries: Mutex<VecDeque<AuditEntry>>,
    len: AtomicUsize,
    capacity: usize,
}

impl AuditLog {
    /// Create a log retaining at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> AuditResult<Self> {
        if capacity == 0 {
            return Err(AuditError::InvalidCapacity { got: capacity });
        }
        Ok(Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            len: AtomicUsize::new(0),
            capacity,
        })
    }

    /// Append an entry, evicting oldest-first once over capacity.
    ///
    /// Never fails the caller: a poisoned lock is recovered and the append
    /// proceeds on the inner state.
    pub fn append(&self, entry: AuditEntry) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
        self.len.store(entries.len(), Ordering::Release);
    }

    /// All retained entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Retained entries whose category matches exactly, case-insensitively.
    #[must_use]
    pub fn entries_for(&self, category: &str) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|e| e.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured retention capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
