//! Convenience re-exports for embedders of the control plane.

pub use crate::builtin::ConfirmProvider;
pub use crate::command::{CommandSpec, ParamSpec, ParamType};
pub use crate::control::{ControlPlane, ControlPlaneError};
pub use crate::dispatcher::Dispatcher;
pub use crate::provider::{CapabilityProvider, InvokeContext, ProviderError};
pub use crate::registry::CommandRegistry;

pub use warden_config::WardenConfig;
pub use warden_core::{ErrorCode, WardenHome};
pub use warden_envelope::Envelope;
