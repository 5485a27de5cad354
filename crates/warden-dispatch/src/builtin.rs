//! Built-in provider exposing the confirmation workflow as commands.
//!
//! The agent drives human sign-off through the same uniform command surface
//! as everything else: `confirm.request` flags an action, a human (or another
//! process) later flips the backing file, and `confirm.check` polls the
//! outcome. No command here blocks waiting for a decision.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use warden_confirm::{ConfirmError, ConfirmationManager, ConfirmationRequest};
use warden_core::ConfirmationId;

use crate::command::{CommandSpec, ParamSpec, ParamType};
use crate::provider::{CapabilityProvider, InvokeContext, ProviderError};

/// Capability provider for the `confirm.*` command family.
pub struct ConfirmProvider {
    manager: Arc<ConfirmationManager>,
}

impl ConfirmProvider {
    /// Expose `manager` as commands.
    #[must_use]
    pub fn new(manager: Arc<ConfirmationManager>) -> Self {
        Self { manager }
    }

    fn parse_id(args: &Map<String, Value>) -> Result<ConfirmationId, ProviderError> {
        let raw = args
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::Failed("missing id".to_string()))?;
        ConfirmationId::parse(raw).ok_or_else(|| {
            ProviderError::Confirmation(format!("unknown confirmation request: {raw}"))
        })
    }

    fn render(request: &ConfirmationRequest) -> Value {
        json!({
            "id": request.id.to_string(),
            "action": request.action,
            "reason": request.reason,
            "status": request.status,
            "createdAt": request.created_at,
            "resolvedAt": request.resolved_at,
            "path": request.path.display().to_string(),
        })
    }
}

impl From<ConfirmError> for ProviderError {
    fn from(error: ConfirmError) -> Self {
        match error {
            ConfirmError::UnknownRequest { .. } | ConfirmError::AlreadyResolved { .. } => {
                ProviderError::Confirmation(error.to_string())
            },
            ConfirmError::Storage(e) => ProviderError::Failed(e.to_string()),
        }
    }
}

#[async_trait]
impl CapabilityProvider for ConfirmProvider {
    fn declarations(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("confirm.request", "Create a pending confirmation for an action")
                .mutating()
                .param(ParamSpec::required("action", ParamType::String, "Action awaiting sign-off"))
                .param(ParamSpec::required("reason", ParamType::String, "Why approval is needed")),
            CommandSpec::new("confirm.check", "Re-read the status of a confirmation")
                .param(ParamSpec::required("id", ParamType::String, "Confirmation id")),
            CommandSpec::new("confirm.approve", "Approve a pending confirmation")
                .mutating()
                .param(ParamSpec::required("id", ParamType::String, "Confirmation id")),
            CommandSpec::new("confirm.deny", "Deny a pending confirmation")
                .mutating()
                .param(ParamSpec::required("id", ParamType::String, "Confirmation id")),
            CommandSpec::new("confirm.pending", "List confirmations awaiting a decision"),
        ]
    }

    async fn invoke(
        &self,
        command: &str,
        args: &Map<String, Value>,
        _ctx: &InvokeContext,
    ) -> Result<Value, ProviderError> {
        match command {
            "confirm.request" => {
                let action = args.get("action").and_then(Value::as_str).unwrap_or_default();
                let reason = args.get("reason").and_then(Value::as_str).unwrap_or_default();
                let request = self.manager.create(action, reason)?;
                Ok(Self::render(&request))
            },
            "confirm.check" => {
                let id = Self::parse_id(args)?;
                Ok(Self::render(&self.manager.check(&id)?))
            },
            "confirm.approve" => {
                let id = Self::parse_id(args)?;
                Ok(Self::render(&self.manager.approve(&id)?))
            },
            "confirm.deny" => {
                let id = Self::parse_id(args)?;
                Ok(Self::render(&self.manager.deny(&id)?))
            },
            "confirm.pending" => {
                let pending: Vec<Value> =
                    self.manager.list_pending().iter().map(Self::render).collect();
                Ok(json!({ "items": pending, "count": pending.len() }))
            },
            other => Err(ProviderError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> (tempfile::TempDir, ConfirmProvider) {
        let dir = tempfile::tempdir().unwrap();
        let manager = Arc::new(ConfirmationManager::new(dir.path().join("confirm")).unwrap());
        (dir, ConfirmProvider::new(manager))
    }

    fn args(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string())))
            .collect()
    }

    #[tokio::test]
    async fn test_request_then_approve_then_check() {
        let (_dir, provider) = provider();
        let ctx = InvokeContext::unrestricted();

        let created = provider
            .invoke(
                "confirm.request",
                &args(&[("action", "file.delete"), ("reason", "drops user data")]),
                &ctx,
            )
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["status"], json!("pending"));

        provider
            .invoke("confirm.approve", &args(&[("id", &id)]), &ctx)
            .await
            .unwrap();

        let checked = provider
            .invoke("confirm.check", &args(&[("id", &id)]), &ctx)
            .await
            .unwrap();
        assert_eq!(checked["status"], json!("approved"));
        assert!(!checked["resolvedAt"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_id_is_confirmation_error() {
        let (_dir, provider) = provider();
        let ctx = InvokeContext::unrestricted();

        for command in ["confirm.check", "confirm.approve", "confirm.deny"] {
            let err = provider
                .invoke(command, &args(&[("id", "not-a-uuid")]), &ctx)
                .await
                .unwrap_err();
            assert!(matches!(err, ProviderError::Confirmation(_)), "{command}");
        }
    }

    #[tokio::test]
    async fn test_double_resolution_is_confirmation_error() {
        let (_dir, provider) = provider();
        let ctx = InvokeContext::unrestricted();

        let created = provider
            .invoke(
                "confirm.request",
                &args(&[("action", "a.b"), ("reason", "r")]),
                &ctx,
            )
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        provider
            .invoke("confirm.deny", &args(&[("id", &id)]), &ctx)
            .await
            .unwrap();
        let err = provider
            .invoke("confirm.approve", &args(&[("id", &id)]), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Confirmation(_)));
    }

    #[tokio::test]
    async fn test_pending_listing() {
        let (_dir, provider) = provider();
        let ctx = InvokeContext::unrestricted();

        provider
            .invoke(
                "confirm.request",
                &args(&[("action", "a.b"), ("reason", "first")]),
                &ctx,
            )
            .await
            .unwrap();

        let pending = provider
            .invoke("confirm.pending", &Map::new(), &ctx)
            .await
            .unwrap();
        assert_eq!(pending["count"], json!(1));
        assert_eq!(pending["items"][0]["reason"], json!("first"));
    }
}
