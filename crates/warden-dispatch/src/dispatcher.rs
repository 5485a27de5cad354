//! The dispatch pipeline: every safety layer applied in order, one envelope out.

use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

use warden_audit::{ActionLog, AuditEntry, AuditLog};
use warden_core::ErrorCode;
use warden_envelope::Envelope;
use warden_guard::{EmergencyStop, RateLimiter, SafeZone};
use warden_policy::CommandPolicy;

use crate::command::{bind_params, CommandSpec};
use crate::provider::{InvokeContext, ProviderError};
use crate::registry::CommandRegistry;

/// The top-level router: turns `(command name, JSON parameters)` into a
/// response envelope, applying policy, emergency stop, rate limiting, and
/// the safe zone before any provider code runs.
///
/// Every component is an explicitly injected instance owned by the
/// composition root — no global state, so tests compose isolated pipelines.
pub struct Dispatcher {
    registry: CommandRegistry,
    policy: Arc<CommandPolicy>,
    stop: Arc<EmergencyStop>,
    limiter: Arc<RateLimiter>,
    safe_zone: Arc<SafeZone>,
    audit: Arc<AuditLog>,
    actions: Arc<ActionLog>,
}

impl Dispatcher {
    /// Assemble a dispatcher from its injected components.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: CommandRegistry,
        policy: Arc<CommandPolicy>,
        stop: Arc<EmergencyStop>,
        limiter: Arc<RateLimiter>,
        safe_zone: Arc<SafeZone>,
        audit: Arc<AuditLog>,
        actions: Arc<ActionLog>,
    ) -> Self {
        Self {
            registry,
            policy,
            stop,
            limiter,
            safe_zone,
            audit,
            actions,
        }
    }

    /// Dispatch one command.
    ///
    /// Never returns a raw fault: every refusal and failure comes back as a
    /// failure envelope with a code from the error taxonomy.
    pub async fn dispatch(&self, name: &str, params: Value) -> Envelope {
        // 1. Resolve. Unknown names have no side effects.
        let Some(descriptor) = self.registry.get(name) else {
            return Envelope::failure(ErrorCode::NotFound, format!("unknown command: {name}"));
        };
        let spec = &descriptor.spec;

        // 2. Bind and validate parameters. No side effects on failure.
        let bound = match bind_params(spec, &params) {
            Ok(bound) => bound,
            Err(message) => return Envelope::failure(ErrorCode::BadRequest, message),
        };

        // 3. Emergency stop refuses everything before downstream state is touched.
        if self.stop.is_triggered() {
            tracing::warn!(command = name, "refused: emergency stop active");
            return Envelope::failure(
                ErrorCode::Cancelled,
                "emergency stop active - operation cancelled",
            );
        }

        // 4. Shell-like commands go through the command policy. A violation
        //    prevents execution entirely; only the refusal is recorded.
        if spec.shell_like {
            if let Some(reason) = self.check_shell_policy(&bound) {
                let command_text = shell_command_text(&bound);
                tracing::warn!(command = name, %reason, "refused: policy violation");
                self.audit.append(AuditEntry::failure(
                    "policy",
                    "refuse",
                    command_text.as_str(),
                    0,
                    reason.as_str(),
                ));
                return Envelope::failure(
                    ErrorCode::PolicyViolation,
                    format!("blocked command '{command_text}': {reason}"),
                );
            }
        }

        // 5. Rate ceiling. Exceeding it rejects the dispatch.
        if self.limiter.record_and_check() {
            tracing::warn!(command = name, "refused: rate limit exceeded");
            return Envelope::failure(
                ErrorCode::RateLimited,
                format!("rate limit of {}/s exceeded", self.limiter.limit()),
            );
        }

        // 5a. Safe zone: mutating input-injection outside the region is refused.
        if let Some(refusal) = self.check_safe_zone(spec, &bound) {
            return refusal;
        }

        // 6. Execute under the emergency-stop generation captured now, so a
        //    mid-flight trigger cancels even a provider that never polls.
        let ctx = InvokeContext {
            cancellation: self.stop.token(),
            safe_zone: self.safe_zone.current(),
        };
        let started = Instant::now();
        let result = tokio::select! {
            result = descriptor.provider.invoke(name, &bound, &ctx) => result,
            () = ctx.cancellation.cancelled() => Err(ProviderError::Cancelled),
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        // 7. Record what ran: every command in the action log, shell-like
        //    commands in the audit log as well.
        self.actions
            .record(name, Value::Object(bound.clone()), elapsed_ms, result.is_ok());
        if spec.shell_like {
            let detail = shell_command_text(&bound);
            let entry = match &result {
                Ok(_) => AuditEntry::success("shell", spec.action(), detail, elapsed_ms),
                Err(e) => {
                    AuditEntry::failure("shell", spec.action(), detail, elapsed_ms, e.to_string())
                },
            };
            self.audit.append(entry);
        }

        // 8. Serialize.
        match result {
            Ok(value) => Envelope::success(value).with_elapsed_ms(elapsed_ms),
            Err(e) => {
                tracing::debug!(command = name, error = %e, "provider failure");
                Envelope::failure(error_code_for(&e), e.to_string()).with_elapsed_ms(elapsed_ms)
            },
        }
    }

    /// The reflective discovery surface (always available, even while the
    /// emergency stop is active).
    #[must_use]
    pub fn help(&self, topic: Option<&str>) -> Envelope {
        match self.registry.help(topic) {
            Some(value) => Envelope::success(value),
            None => Envelope::failure(
                ErrorCode::NotFound,
                format!("unknown help topic: {}", topic.unwrap_or("")),
            ),
        }
    }

    /// The command registry.
    #[must_use]
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Evaluate the policy for a shell-like command's bound arguments.
    ///
    /// Commands arrive in one of two shapes: a parsed `program` (+ optional
    /// `arguments`), or a single opaque `command` string. The opaque form is
    /// checked twice — first token as the program, then the whole string as
    /// arguments to a synthesized `cmd.exe /C` invocation — so pattern blocks
    /// cannot be bypassed by packing the construct into one string.
    fn check_shell_policy(&self, bound: &Map<String, Value>) -> Option<String> {
        if let Some(program) = bound.get("program").and_then(Value::as_str) {
            let arguments = bound.get("arguments").and_then(Value::as_str).unwrap_or("");
            return self.policy.check_violation(program, arguments);
        }

        if let Some(command) = bound.get("command").and_then(Value::as_str) {
            let trimmed = command.trim();
            let (program, arguments) = match trimmed.split_once(char::is_whitespace) {
                Some((p, a)) => (p, a.trim_start()),
                None => (trimmed, ""),
            };
            if let Some(reason) = self.policy.check_violation(program, arguments) {
                return Some(reason);
            }
            return self
                .policy
                .check_violation("cmd.exe", &format!("/C {trimmed}"));
        }

        None
    }

    fn check_safe_zone(&self, spec: &CommandSpec, bound: &Map<String, Value>) -> Option<Envelope> {
        if !spec.input_injecting || !spec.mutating {
            return None;
        }
        let config = self.safe_zone.current()?;
        let region = config.region?;
        let x = bound.get("x").and_then(Value::as_i64)?;
        let y = bound.get("y").and_then(Value::as_i64)?;
        if region.contains(x, y) {
            return None;
        }
        tracing::warn!(window = %config.window, x, y, "refused: outside safe zone");
        Some(Envelope::failure(
            ErrorCode::BadRequest,
            format!(
                "coordinates ({x}, {y}) are outside the safe zone for window '{}'",
                config.window
            ),
        ))
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// The command text for audit entries and violation messages.
fn shell_command_text(bound: &Map<String, Value>) -> String {
    if let Some(program) = bound.get("program").and_then(Value::as_str) {
        return match bound.get("arguments").and_then(Value::as_str) {
            Some(arguments) if !arguments.is_empty() => format!("{program} {arguments}"),
            _ => program.to_string(),
        };
    }
    bound
        .get("command")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn error_code_for(error: &ProviderError) -> ErrorCode {
    match error {
        ProviderError::Unsupported(_) => ErrorCode::Unsupported,
        ProviderError::Cancelled => ErrorCode::Cancelled,
        ProviderError::Confirmation(_) => ErrorCode::ConfirmationError,
        ProviderError::Failed(_) => ErrorCode::ProviderFailure,
    }
}
