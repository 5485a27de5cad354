//! Confirmation request types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use warden_core::{ConfirmationId, Timestamp};

/// Lifecycle state of a confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationStatus {
    /// Awaiting a human decision.
    Pending,
    /// Approved — terminal.
    Approved,
    /// Denied — terminal.
    Denied,
}

impl ConfirmationStatus {
    /// Whether this is a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// A pending or resolved approval request.
///
/// The backing file is the durable record; this struct is its in-memory
/// image plus the file path it was read from or written to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRequest {
    /// Unique request id (also the backing file's stem).
    pub id: ConfirmationId,
    /// The action awaiting sign-off (e.g. `"file.delete"`).
    pub action: String,
    /// Human-readable reason the action needs approval.
    pub reason: String,
    /// Current lifecycle state.
    pub status: ConfirmationStatus,
    /// When the request was created.
    pub created_at: Timestamp,
    /// When the request reached a terminal state; `None` while pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<Timestamp>,
    /// The backing file path. Not part of the durable record.
    #[serde(skip)]
    pub path: PathBuf,
}

impl ConfirmationRequest {
    /// Create a new pending request (not yet persisted).
    #[must_use]
    pub fn new(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: ConfirmationId::new(),
            action: action.into(),
            reason: reason.into(),
            status: ConfirmationStatus::Pending,
            created_at: Timestamp::now(),
            resolved_at: None,
            path: PathBuf::new(),
        }
    }

    /// Whether the request is still awaiting a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ConfirmationStatus::Pending
    }
}

impl fmt::Display for ConfirmationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.id, self.status, self.action)
    }
}
