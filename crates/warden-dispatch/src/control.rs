//! The composition root: every component built once, wired explicitly.

use std::sync::Arc;

use warden_audit::{ActionLog, AuditError, AuditLog};
use warden_config::WardenConfig;
use warden_confirm::{ConfirmError, ConfirmationManager};
use warden_core::WardenHome;
use warden_envelope::Envelope;
use warden_guard::{EmergencyStop, RateLimiter, SafeZone};
use warden_policy::{CommandPolicy, PolicyError};

use crate::builtin::ConfirmProvider;
use crate::dispatcher::Dispatcher;
use crate::error::RegistryError;
use crate::provider::CapabilityProvider;
use crate::registry::CommandRegistry;

/// Errors aborting control-plane construction.
///
/// All of these are startup failures: a mis-declared command, a malformed
/// policy pattern, an unusable confirmation directory. Nothing here is
/// recoverable at dispatch time — construction fails loudly instead.
#[derive(Debug, thiserror::Error)]
pub enum ControlPlaneError {
    /// Command registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A configured policy pattern did not compile.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// The audit log configuration is invalid.
    #[error(transparent)]
    Audit(#[from] AuditError),

    /// The confirmation backing directory could not be prepared.
    #[error(transparent)]
    Confirm(#[from] ConfirmError),
}

/// The assembled control plane.
///
/// Owns every shared component and the dispatcher that composes them. There
/// are no global singletons: tests (and embedders) construct as many
/// isolated instances as they like.
pub struct ControlPlane {
    dispatcher: Dispatcher,
    policy: Arc<CommandPolicy>,
    stop: Arc<EmergencyStop>,
    limiter: Arc<RateLimiter>,
    safe_zone: Arc<SafeZone>,
    audit: Arc<AuditLog>,
    actions: Arc<ActionLog>,
    confirmations: Arc<ConfirmationManager>,
}

impl ControlPlane {
    /// Build the control plane from configuration and capability providers.
    ///
    /// The `confirm.*` command family is registered automatically alongside
    /// the given providers.
    ///
    /// # Errors
    ///
    /// Returns a [`ControlPlaneError`] on any configuration problem —
    /// duplicate command names, invalid policy patterns, zero audit
    /// capacity, or an unusable confirmation directory.
    pub fn new(
        config: &WardenConfig,
        home: &WardenHome,
        providers: Vec<Arc<dyn CapabilityProvider>>,
    ) -> Result<Self, ControlPlaneError> {
        let policy = Arc::new(if config.policy.use_defaults {
            CommandPolicy::default_policy()
        } else {
            CommandPolicy::new()
        });
        for program in &config.policy.blocked_programs {
            policy.block_program(program);
        }
        for pattern in &config.policy.blocked_patterns {
            policy.block_pattern(pattern)?;
        }

        let stop = Arc::new(EmergencyStop::new());
        let limiter = Arc::new(RateLimiter::with_limit(config.rate.max_per_second));
        let safe_zone = Arc::new(SafeZone::new());
        let audit = Arc::new(AuditLog::new(config.audit.capacity)?);
        let actions = Arc::new(ActionLog::with_capacity(config.actions.capacity));

        let confirm_dir = config
            .confirmations
            .dir
            .clone()
            .unwrap_or_else(|| home.confirmations_dir());
        let confirmations = Arc::new(ConfirmationManager::new(confirm_dir)?);

        let mut all_providers = providers;
        all_providers.push(Arc::new(ConfirmProvider::new(Arc::clone(&confirmations))));
        let registry = CommandRegistry::new(all_providers)?;

        let dispatcher = Dispatcher::new(
            registry,
            Arc::clone(&policy),
            Arc::clone(&stop),
            Arc::clone(&limiter),
            Arc::clone(&safe_zone),
            Arc::clone(&audit),
            Arc::clone(&actions),
        );

        tracing::info!(
            commands = dispatcher.registry().len(),
            rate_limit = config.rate.max_per_second,
            "control plane assembled"
        );

        Ok(Self {
            dispatcher,
            policy,
            stop,
            limiter,
            safe_zone,
            audit,
            actions,
            confirmations,
        })
    }

    /// Dispatch one command through the full safety pipeline.
    pub async fn dispatch(&self, name: &str, params: serde_json::Value) -> Envelope {
        self.dispatcher.dispatch(name, params).await
    }

    /// The reflective discovery surface.
    #[must_use]
    pub fn help(&self, topic: Option<&str>) -> Envelope {
        self.dispatcher.help(topic)
    }

    /// The command policy.
    #[must_use]
    pub fn policy(&self) -> &Arc<CommandPolicy> {
        &self.policy
    }

    /// The emergency stop (wire a global hotkey listener to
    /// [`EmergencyStop::trigger`]).
    #[must_use]
    pub fn emergency_stop(&self) -> &Arc<EmergencyStop> {
        &self.stop
    }

    /// The dispatch rate limiter.
    #[must_use]
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// The safe-zone restriction slot.
    #[must_use]
    pub fn safe_zone(&self) -> &Arc<SafeZone> {
        &self.safe_zone
    }

    /// The audit log.
    #[must_use]
    pub fn audit_log(&self) -> &Arc<AuditLog> {
        &self.audit
    }

    /// The action log.
    #[must_use]
    pub fn action_log(&self) -> &Arc<ActionLog> {
        &self.actions
    }

    /// The confirmation manager.
    #[must_use]
    pub fn confirmations(&self) -> &Arc<ConfirmationManager> {
        &self.confirmations
    }
}

impl std::fmt::Debug for ControlPlane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlPlane")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn home() -> (tempfile::TempDir, WardenHome) {
        let dir = tempfile::tempdir().unwrap();
        let home = WardenHome::at(dir.path());
        (dir, home)
    }

    #[tokio::test]
    async fn test_assembles_with_defaults_and_builtin_commands() {
        let (_dir, home) = home();
        let plane = ControlPlane::new(&WardenConfig::default(), &home, Vec::new()).unwrap();

        // The confirm family is registered even with no external providers.
        let env = plane.help(Some("confirm"));
        assert!(env.is_ok());

        let env = plane
            .dispatch(
                "confirm.request",
                json!({"action": "file.delete", "reason": "cleanup"}),
            )
            .await;
        assert!(env.is_ok());
        assert_eq!(plane.confirmations().list_pending().len(), 1);
    }

    #[tokio::test]
    async fn test_config_policy_additions_apply() {
        let (_dir, home) = home();
        let mut config = WardenConfig::default();
        config.policy.blocked_programs.push("netsh".to_string());
        let plane = ControlPlane::new(&config, &home, Vec::new()).unwrap();

        assert!(plane.policy().check_violation("netsh", "wlan show").is_some());
        // Default seeds still apply on top.
        assert!(plane.policy().check_violation("shutdown", "").is_some());
    }

    #[tokio::test]
    async fn test_invalid_config_pattern_fails_construction() {
        let (_dir, home) = home();
        let mut config = WardenConfig::default();
        config.policy.blocked_patterns.push("[unclosed".to_string());
        assert!(matches!(
            ControlPlane::new(&config, &home, Vec::new()),
            Err(ControlPlaneError::Policy(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_audit_capacity_fails_construction() {
        let (_dir, home) = home();
        let mut config = WardenConfig::default();
        config.audit.capacity = 0;
        assert!(matches!(
            ControlPlane::new(&config, &home, Vec::new()),
            Err(ControlPlaneError::Audit(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_command_envelope() {
        let (_dir, home) = home();
        let plane = ControlPlane::new(&WardenConfig::default(), &home, Vec::new()).unwrap();
        let env = plane.dispatch("nope.nothing", Value::Null).await;
        assert_eq!(env.error_code(), Some(warden_core::ErrorCode::NotFound));
    }
}
