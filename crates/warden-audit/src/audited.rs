//! Auditing decorator for executable capabilities.
//!
//! [`AuditedShell`] wraps any [`ShellExecutor`], times each call, appends one
//! [`AuditEntry`] capturing success or failure (with error text), and returns
//! the original result unchanged — auditing is transparent to control flow.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use warden_core::{ShellError, ShellExecutor, ShellOutput};

use crate::log::{AuditEntry, AuditLog};

/// The audit category recorded for shell invocations.
const SHELL_CATEGORY: &str = "shell";

/// A [`ShellExecutor`] that records every invocation to an [`AuditLog`].
pub struct AuditedShell<E> {
    inner: E,
    log: Arc<AuditLog>,
}

impl<E> AuditedShell<E> {
    /// Wrap `inner`, recording to `log`.
    pub fn new(inner: E, log: Arc<AuditLog>) -> Self {
        Self { inner, log }
    }

    /// The wrapped executor.
    pub fn inner(&self) -> &E {
        &self.inner
    }

    fn record(&self, action: &str, detail: &str, started: Instant, result: &Result<ShellOutput, ShellError>) {
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let entry = match result {
            Ok(output) if output.success() => {
                AuditEntry::success(SHELL_CATEGORY, action, detail, duration_ms)
            },
            // Non-zero exit is still a completed execution; record it as such
            // with the exit code in the error text.
            Ok(output) => AuditEntry::failure(
                SHELL_CATEGORY,
                action,
                detail,
                duration_ms,
                format!("exit code {}", output.exit_code),
            ),
            Err(e) => AuditEntry::failure(SHELL_CATEGORY, action, detail, duration_ms, e.to_string()),
        };
        self.log.append(entry);
    }
}

#[async_trait]
impl<E: ShellExecutor> ShellExecutor for AuditedShell<E> {
    async fn run(&self, program: &str, arguments: &str) -> Result<ShellOutput, ShellError> {
        let started = Instant::now();
        let result = self.inner.run(program, arguments).await;
        self.record("run", &format!("{program} {arguments}"), started, &result);
        result
    }

    async fn run_command_line(&self, command_line: &str) -> Result<ShellOutput, ShellError> {
        let started = Instant::now();
        let result = self.inner.run_command_line(command_line).await;
        self.record("run", command_line, started, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A test executor with a scripted outcome.
    struct ScriptedShell {
        outcome: Result<ShellOutput, ShellError>,
    }

    #[async_trait]
    impl ShellExecutor for ScriptedShell {
        async fn run(&self, _program: &str, _arguments: &str) -> Result<ShellOutput, ShellError> {
            self.outcome.clone()
        }

        async fn run_command_line(&self, _command_line: &str) -> Result<ShellOutput, ShellError> {
            self.outcome.clone()
        }
    }

    fn ok_output() -> ShellOutput {
        ShellOutput {
            exit_code: 0,
            stdout: "hi\n".to_string(),
            stderr: String::new(),
        }
    }

    #[tokio::test]
    async fn test_success_is_recorded_and_returned() {
        let log = Arc::new(AuditLog::new(10).unwrap());
        let shell = AuditedShell::new(
            ScriptedShell {
                outcome: Ok(ok_output()),
            },
            Arc::clone(&log),
        );

        let output = shell.run("echo", "hi").await.unwrap();
        assert_eq!(output.stdout, "hi\n");

        let entries = log.entries_for("shell");
        assert_eq!(entries.len(), 1);
        assert!(entries[0].success);
        assert_eq!(entries[0].detail, "echo hi");
        assert_eq!(entries[0].action, "run");
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_reraised() {
        let log = Arc::new(AuditLog::new(10).unwrap());
        let shell = AuditedShell::new(
            ScriptedShell {
                outcome: Err(ShellError::Failed("boom".to_string())),
            },
            Arc::clone(&log),
        );

        let err = shell.run_command_line("explode").await.unwrap_err();
        assert!(matches!(err, ShellError::Failed(_)));

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].success);
        assert_eq!(entries[0].detail, "explode");
        assert!(entries[0].error.as_deref().unwrap().contains("boom"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_recorded_as_failure() {
        let log = Arc::new(AuditLog::new(10).unwrap());
        let shell = AuditedShell::new(
            ScriptedShell {
                outcome: Ok(ShellOutput {
                    exit_code: 2,
                    stdout: String::new(),
                    stderr: "nope".to_string(),
                }),
            },
            Arc::clone(&log),
        );

        // The call itself still succeeds — exit code is data, not an error.
        let output = shell.run("grep", "missing file.txt").await.unwrap();
        assert_eq!(output.exit_code, 2);

        let entries = log.entries();
        assert!(!entries[0].success);
        assert!(entries[0].error.as_deref().unwrap().contains("exit code 2"));
    }
}
