//! Warden Audit - bounded, thread-safe records of what the agent actually did.
//!
//! Two separate stores with different retention and purpose:
//!
//! - [`AuditLog`]: append-only record of executed shell-like operations
//!   (category, action, detail, success, duration, error text). Consumed by
//!   the [`AuditedShell`] decorator wrapping an executable capability.
//! - [`ActionLog`]: coarser ring buffer of the most recent dispatched
//!   commands across *all* categories, for fast recent-activity introspection.
//!
//! Both evict oldest-first under capacity pressure, and neither ever fails
//! the operation that is being recorded — a logging failure is logged and
//! swallowed, never propagated.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod actions;
pub mod audited;
/// Error types and results for the audit module.
pub mod error;
pub mod log;

pub use actions::{ActionLog, ActionRecord, DEFAULT_ACTION_CAPACITY};
pub use audited::AuditedShell;
pub use error::{AuditError, AuditResult};
pub use log::{AuditEntry, AuditLog};
