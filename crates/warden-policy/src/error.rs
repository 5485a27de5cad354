/// Errors that can occur registering or enforcing command policy.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// A blocked-pattern regex failed to compile at registration.
    #[error("invalid blocked pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The rejected pattern source.
        pattern: String,
        /// The compiler's diagnostic.
        reason: String,
    },

    /// A command was refused by policy; carries the blocked command text.
    #[error("blocked by policy: {command:?} - {reason}")]
    Violation {
        /// The command text that was refused.
        command: String,
        /// The human-readable violation message.
        reason: String,
    },
}

/// Result type for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;
