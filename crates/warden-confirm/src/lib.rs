//! Warden Confirm - out-of-band human approval for flagged actions.
//!
//! Destructive or irreversible automation actions can require a human
//! sign-off that happens *out of band*: a person reviews a side channel (a
//! file, a dashboard) and flips the status, rather than the calling thread
//! blocking on a prompt. State is therefore file-backed — one JSON file per
//! request in a well-known directory — so approval can come from a separate
//! process or a later poll, and pending requests survive a restart.
//!
//! The state machine per request is `Pending -> Approved` or
//! `Pending -> Denied`, both terminal.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Error types and results for the confirmation module.
pub mod error;
pub mod manager;
pub mod request;

pub use error::{ConfirmError, ConfirmResult};
pub use manager::ConfirmationManager;
pub use request::{ConfirmationRequest, ConfirmationStatus};
