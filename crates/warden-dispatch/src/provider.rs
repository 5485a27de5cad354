//! The capability-provider contract.
//!
//! A capability provider implements one concrete automation surface (mouse,
//! shell, clipboard, window control, ...) behind a narrow interface: declare
//! your commands as data, then execute them by name. The control plane knows
//! nothing about how a provider performs its work.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use warden_guard::SafeZoneConfig;

use crate::command::CommandSpec;

/// Errors a provider may surface from [`CapabilityProvider::invoke`].
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider declines an optional operation it does not implement.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// The operation observed the cancellation token and stopped.
    #[error("operation cancelled")]
    Cancelled,

    /// A confirmation-workflow failure (unknown id, invalid transition).
    #[error("{0}")]
    Confirmation(String),

    /// The underlying operation failed.
    #[error("{0}")]
    Failed(String),
}

/// Per-invocation context handed to providers.
#[derive(Debug, Clone)]
pub struct InvokeContext {
    /// The emergency-stop generation captured at dispatch time. Long-running
    /// or blocking operations must observe this cooperatively.
    pub cancellation: CancellationToken,
    /// The active safe-zone restriction, if any. Input-injecting providers
    /// are expected to reject or clamp coordinates outside it.
    pub safe_zone: Option<SafeZoneConfig>,
}

impl InvokeContext {
    /// A context with no active restriction and a fresh token (tests,
    /// out-of-band invocation).
    #[must_use]
    pub fn unrestricted() -> Self {
        Self {
            cancellation: CancellationToken::new(),
            safe_zone: None,
        }
    }
}

/// A capability provider: declares commands as data, executes them by name.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// The commands this provider implements.
    ///
    /// Called once at registry construction; the returned specs are
    /// immutable thereafter.
    fn declarations(&self) -> Vec<CommandSpec>;

    /// Execute one of the declared commands.
    ///
    /// `args` has already been validated against the declared schema. The
    /// returned value becomes the envelope's `data` payload.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] which the dispatcher normalizes into the
    /// envelope error taxonomy.
    async fn invoke(
        &self,
        command: &str,
        args: &Map<String, Value>,
        ctx: &InvokeContext,
    ) -> Result<Value, ProviderError>;
}
