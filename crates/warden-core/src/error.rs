//! The error-code taxonomy for refusals and failures.
//!
//! Every error that crosses the dispatch boundary is mapped onto exactly one
//! of these codes before it is serialized into the response envelope. Nothing
//! else ever crosses that boundary as a raw fault.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error codes carried in the response envelope's `error.code` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Unknown command name.
    NotFound,
    /// Malformed or missing parameters.
    BadRequest,
    /// Blocked by the command policy; the message carries the offending command.
    PolicyViolation,
    /// Emergency stop was active at dispatch time or fired mid-flight.
    Cancelled,
    /// The capability provider declines an optional operation.
    Unsupported,
    /// The underlying operation failed.
    ProviderFailure,
    /// Unknown confirmation id or invalid confirmation transition.
    ConfirmationError,
    /// The dispatch-level rate ceiling was exceeded.
    RateLimited,
    /// Anything that should have been impossible (serialization of a
    /// supported payload failed). The envelope still renders.
    Internal,
}

impl ErrorCode {
    /// The wire string for this code (`snake_case`, matching serde).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::PolicyViolation => "policy_violation",
            Self::Cancelled => "cancelled",
            Self::Unsupported => "unsupported",
            Self::ProviderFailure => "provider_failure",
            Self::ConfirmationError => "confirmation_error",
            Self::RateLimited => "rate_limited",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings_match_serde() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::BadRequest,
            ErrorCode::PolicyViolation,
            ErrorCode::Cancelled,
            ErrorCode::Unsupported,
            ErrorCode::ProviderFailure,
            ErrorCode::ConfirmationError,
            ErrorCode::RateLimited,
            ErrorCode::Internal,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }
}
