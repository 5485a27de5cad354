//! Warden Dispatch - the single entry point of the control plane.
//!
//! Turns a `(command name, JSON parameters)` pair into a response envelope,
//! applying every safety layer on the way:
//!
//! 1. Resolve the command in the immutable [`CommandRegistry`]
//! 2. Bind and validate parameters against the declared schema
//! 3. Refuse if the [`EmergencyStop`](warden_guard::EmergencyStop) is active
//! 4. Run shell-like commands through the
//!    [`CommandPolicy`](warden_policy::CommandPolicy)
//! 5. Reject when over the [`RateLimiter`](warden_guard::RateLimiter) ceiling
//! 6. Check input-injection coordinates against the active
//!    [`SafeZone`](warden_guard::SafeZone)
//! 7. Execute against the capability provider, under the emergency-stop
//!    cancellation token, measuring elapsed time
//! 8. Record to the action log (and audit log for shell-like commands) and
//!    serialize through the [`Envelope`](warden_envelope::Envelope)
//!
//! Capability providers declare their commands as plain data — no reflection,
//! no hidden registration. The [`ControlPlane`] composition root wires every
//! component from configuration; nothing in this crate is a global singleton.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod builtin;
pub mod command;
pub mod control;
pub mod dispatcher;
/// Error types for registration and dispatch.
pub mod error;
pub mod prelude;
pub mod provider;
pub mod registry;

pub use builtin::ConfirmProvider;
pub use command::{CommandSpec, ParamSpec, ParamType};
pub use control::{ControlPlane, ControlPlaneError};
pub use dispatcher::Dispatcher;
pub use error::RegistryError;
pub use provider::{CapabilityProvider, InvokeContext, ProviderError};
pub use registry::{CommandDescriptor, CommandRegistry};
