//! Warden Envelope - the canonical response shape for every dispatched command.
//!
//! Every result or error leaving the control plane is serialized into one
//! fixed JSON object:
//!
//! ```json
//! {"ok": true, "data": {...}, "meta": {"ts": "2026-01-01T00:00:00.000Z", "ms": 12}}
//! {"ok": false, "error": {"code": "policy_violation", "message": "..."}, "meta": {"ts": "..."}}
//! ```
//!
//! Absent fields are omitted, never emitted as `null`. The envelope is the
//! last line before the transport: rendering must always produce valid JSON,
//! even when a payload refuses to serialize.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use warden_core::{ErrorCode, Timestamp};

/// The `error` object inside a failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    /// Stable machine-readable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// The `meta` object: timing metadata present on every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    /// ISO-8601 UTC timestamp of when the envelope was produced.
    pub ts: String,
    /// Elapsed milliseconds of the underlying operation, when measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ms: Option<u64>,
}

impl EnvelopeMeta {
    fn now() -> Self {
        Self {
            ts: Timestamp::now().to_iso8601(),
            ms: None,
        }
    }
}

/// A canonical response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Success payload. Present only when `ok` is true and there is data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Failure detail. Present only when `ok` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EnvelopeError>,
    /// Timing metadata.
    pub meta: EnvelopeMeta,
}

impl Envelope {
    /// Build a success envelope from any serializable payload.
    ///
    /// A payload that refuses to serialize (unsupported shape) degrades to an
    /// `internal` failure envelope rather than panicking.
    #[must_use]
    pub fn success(data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self {
                ok: true,
                data: Some(value),
                error: None,
                meta: EnvelopeMeta::now(),
            },
            Err(e) => {
                tracing::warn!("envelope payload failed to serialize: {e}");
                Self::failure(ErrorCode::Internal, format!("payload serialization: {e}"))
            },
        }
    }

    /// Build a success envelope with no payload.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            ok: true,
            data: None,
            error: None,
            meta: EnvelopeMeta::now(),
        }
    }

    /// Build a failure envelope.
    #[must_use]
    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(EnvelopeError {
                code,
                message: message.into(),
            }),
            meta: EnvelopeMeta::now(),
        }
    }

    /// Wrap a list result as `{items, count}`.
    #[must_use]
    pub fn list(items: Vec<Value>) -> Self {
        let count = items.len();
        Self::success(json!({ "items": items, "count": count }))
    }

    /// Wrap a text or markdown result as `{content, format}`.
    #[must_use]
    pub fn text(content: impl Into<String>, format: impl Into<String>) -> Self {
        Self::success(json!({ "content": content.into(), "format": format.into() }))
    }

    /// Wrap a simple human-readable message as `{message}`.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::success(json!({ "message": message.into() }))
    }

    /// Wrap a boolean check as `{result, detail}`.
    #[must_use]
    pub fn check(result: bool, detail: impl Into<String>) -> Self {
        Self::success(json!({ "result": result, "detail": detail.into() }))
    }

    /// Stamp the elapsed time of the underlying operation.
    #[must_use]
    pub fn with_elapsed_ms(mut self, ms: u64) -> Self {
        self.meta.ms = Some(ms);
        self
    }

    /// Check whether this envelope reports success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// The error code, when this is a failure envelope.
    #[must_use]
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|e| e.code)
    }

    /// Render to a JSON string.
    ///
    /// Infallible: the envelope holds only `Value` payloads, so rendering
    /// cannot fail for any envelope this crate constructs. A hypothetical
    /// failure still yields a valid minimal error object.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!("envelope rendering failed: {e}");
            format!(
                "{{\"ok\":false,\"error\":{{\"code\":\"internal\",\"message\":\"envelope rendering failed\"}},\"meta\":{{\"ts\":{:?}}}}}",
                Timestamp::now().to_iso8601()
            )
        })
    }
}
