use crate::request::ConfirmationStatus;

/// Errors that can occur in the confirmation workflow.
#[derive(Debug, thiserror::Error)]
pub enum ConfirmError {
    /// No request with this id exists (or its backing file is missing or
    /// unreadable — externally deleted or corrupted files read as unknown).
    #[error("unknown confirmation request: {id}")]
    UnknownRequest {
        /// The id that failed to resolve.
        id: String,
    },

    /// The request already reached a terminal state.
    #[error("confirmation {id} already resolved as {status}")]
    AlreadyResolved {
        /// The request id.
        id: String,
        /// The terminal state it is in.
        status: ConfirmationStatus,
    },

    /// The backing directory or file could not be read or written. The
    /// previous on-disk state is left untouched when a mutation fails.
    #[error("confirmation storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Result type for confirmation operations.
pub type ConfirmResult<T> = Result<T, ConfirmError>;
