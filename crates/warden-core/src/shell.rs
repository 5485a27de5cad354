//! The narrow shell-execution capability surface.
//!
//! The control plane never runs programs itself; it gates and records calls
//! made through this trait. Concrete implementations (a process spawner, a
//! remote runner, a test double) live outside the control-plane core.
//!
//! Two invocation forms exist because callers arrive with both shapes:
//! a parsed `(program, arguments)` pair, and a single opaque command line
//! that the host shell will interpret. Policy enforcement treats the two
//! differently — see `warden-policy`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a completed shell invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    /// Process exit code.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ShellOutput {
    /// Whether the process exited zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Errors surfaced by a shell executor.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ShellError {
    /// The program could not be launched at all.
    #[error("failed to launch {program}: {reason}")]
    Launch {
        /// Program that failed to start.
        program: String,
        /// Why the launch failed.
        reason: String,
    },

    /// The invocation started but failed before producing a usable outcome.
    #[error("execution failed: {0}")]
    Failed(String),

    /// The command was refused by policy before anything ran.
    #[error("blocked by policy: {command:?} - {reason}")]
    Blocked {
        /// The command text that was refused.
        command: String,
        /// The human-readable violation message.
        reason: String,
    },

    /// The invocation observed a cancellation signal and stopped.
    #[error("operation cancelled")]
    Cancelled,
}

/// An executable shell capability.
///
/// Implementations must observe the cancellation signal they were constructed
/// with (if any) and return [`ShellError::Cancelled`] promptly when it fires.
#[async_trait]
pub trait ShellExecutor: Send + Sync {
    /// Run `program` with a pre-split argument string.
    async fn run(&self, program: &str, arguments: &str) -> Result<ShellOutput, ShellError>;

    /// Run a single opaque command line through the host shell.
    async fn run_command_line(&self, command_line: &str) -> Result<ShellOutput, ShellError>;
}

#[async_trait]
impl<T: ShellExecutor + ?Sized> ShellExecutor for std::sync::Arc<T> {
    async fn run(&self, program: &str, arguments: &str) -> Result<ShellOutput, ShellError> {
        (**self).run(program, arguments).await
    }

    async fn run_command_line(&self, command_line: &str) -> Result<ShellOutput, ShellError> {
        (**self).run_command_line(command_line).await
    }
}
