/// Errors that can occur constructing or querying the audit stores.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// A bounded log was constructed with a capacity of zero.
    #[error("audit log capacity must be positive (got {got})")]
    InvalidCapacity {
        /// The rejected capacity value.
        got: usize,
    },
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;
