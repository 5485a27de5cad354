//! Warden Core - Foundation types for the Warden automation control plane.
//!
//! This crate provides:
//! - The [`Timestamp`] wrapper used for every recorded instant
//! - Id newtypes ([`ConfirmationId`]) shared across crates
//! - The [`ErrorCode`] taxonomy every refusal or failure maps onto
//! - The narrow [`ShellExecutor`] capability surface the decorators wrap
//! - Directory resolution for the Warden home (`~/.warden/`)

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod dirs;
pub mod error;
pub mod shell;
pub mod types;

pub use dirs::WardenHome;
pub use error::ErrorCode;
pub use shell::{ShellError, ShellExecutor, ShellOutput};
pub use types::{ConfirmationId, Timestamp};
