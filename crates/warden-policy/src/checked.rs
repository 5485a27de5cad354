//! Policy-enforcing decorator for shell execution.
//!
//! [`PolicyCheckedShell`] evaluates the [`CommandPolicy`] *before* delegating
//! to the wrapped executor. For the single-string command form the check runs
//! twice — once treating the first whitespace-delimited token as the program,
//! and once treating the entire string as arguments to a synthesized
//! `cmd.exe /C {command}` invocation — so a blocked construct cannot slip
//! through as one opaque string.

use async_trait::async_trait;
use std::sync::Arc;

use warden_core::{ShellError, ShellExecutor, ShellOutput};

use crate::policy::CommandPolicy;

/// A [`ShellExecutor`] that refuses policy-violating commands before they run.
pub struct PolicyCheckedShell<E> {
    inner: E,
    policy: Arc<CommandPolicy>,
}

impl<E> PolicyCheckedShell<E> {
    /// Wrap `inner`, gating every call on `policy`.
    pub fn new(inner: E, policy: Arc<CommandPolicy>) -> Self {
        Self { inner, policy }
    }

    /// The wrapped executor.
    pub fn inner(&self) -> &E {
        &self.inner
    }

    fn refuse(command: &str, reason: String) -> ShellError {
        tracing::warn!(command, %reason, "refusing shell command");
        ShellError::Blocked {
            command: command.to_string(),
            reason,
        }
    }
}

#[async_trait]
impl<E: ShellExecutor> ShellExecutor for PolicyCheckedShell<E> {
    async fn run(&self, program: &str, arguments: &str) -> Result<ShellOutput, ShellError> {
        if let Some(reason) = self.policy.check_violation(program, arguments) {
            return Err(Self::refuse(&format!("{program} {arguments}"), reason));
        }
        self.inner.run(program, arguments).await
    }

    async fn run_command_line(&self, command_line: &str) -> Result<ShellOutput, ShellError> {
        let trimmed = command_line.trim();

        // First pass: first token as the program, the rest as its arguments.
        let (program, arguments) = match trimmed.split_once(char::is_whitespace) {
            Some((p, a)) => (p, a.trim_start()),
            None => (trimmed, ""),
        };
        if let Some(reason) = self.policy.check_violation(program, arguments) {
            return Err(Self::refuse(command_line, reason));
        }

        // Second pass: the whole string as arguments to the host shell, so
        // pattern blocks also apply to constructs hidden inside one string.
        if let Some(reason) = self
            .policy
            .check_violation("cmd.exe", &format!("/C {trimmed}"))
        {
            return Err(Self::refuse(command_line, reason));
        }

        self.inner.run_command_line(command_line).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts invocations so tests can prove nothing ran after a refusal.
    #[derive(Default)]
    struct CountingShell {
        calls: AtomicUsize,
    }

    impl CountingShell {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ShellExecutor for CountingShell {
        async fn run(&self, _program: &str, _arguments: &str) -> Result<ShellOutput, ShellError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ShellOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
            })
        }

        async fn run_command_line(&self, _command_line: &str) -> Result<ShellOutput, ShellError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ShellOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
            })
        }
    }

    fn checked() -> PolicyCheckedShell<CountingShell> {
        PolicyCheckedShell::new(
            CountingShell::default(),
            Arc::new(CommandPolicy::default_policy()),
        )
    }

    #[tokio::test]
    async fn test_two_argument_form_blocked_before_execution() {
        let shell = checked();
        let err = shell.run("shutdown", "/s /t 0").await.unwrap_err();
        assert!(matches!(err, ShellError::Blocked { .. }));
        assert_eq!(shell.inner().calls(), 0);
    }

    #[tokio::test]
    async fn test_single_string_form_blocked_identically() {
        let shell = checked();

        // First token is harmless ("reg"), the idiom is pattern-blocked.
        let err = shell
            .run_command_line(r"reg delete HKCU\Test /f")
            .await
            .unwrap_err();
        let ShellError::Blocked { command, .. } = err else {
            panic!("expected Blocked");
        };
        assert_eq!(command, r"reg delete HKCU\Test /f");
        assert_eq!(shell.inner().calls(), 0);
    }

    #[tokio::test]
    async fn test_opaque_string_cannot_bypass_pattern_block() {
        let shell = checked();
        // "del" is not a blocked program; the del /s idiom is caught by
        // pattern evaluation over the full command line.
        let err = shell
            .run_command_line("del /s /q C:\\Users\\victim")
            .await
            .unwrap_err();
        assert!(matches!(err, ShellError::Blocked { .. }));
        assert_eq!(shell.inner().calls(), 0);
    }

    #[tokio::test]
    async fn test_allowed_commands_pass_through() {
        let shell = checked();
        shell.run("git", "status").await.unwrap();
        shell.run_command_line("echo hello").await.unwrap();
        assert_eq!(shell.inner().calls(), 2);
    }
}
