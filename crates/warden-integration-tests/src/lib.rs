//! Test support for the Warden integration suite.
//!
//! Provides a mock automation provider covering the command shapes the
//! dispatch pipeline cares about (shell, pointer, clipboard), with
//! invocation counting so tests can prove what did and did not run.

#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use warden_core::{ShellError, ShellExecutor, ShellOutput};
use warden_dispatch::{CapabilityProvider, CommandSpec, InvokeContext, ParamSpec, ParamType, ProviderError};

/// Initialize tracing for a test binary. Safe to call repeatedly — only the
/// first call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A scripted in-memory stand-in for a real process spawner.
#[derive(Default)]
pub struct FakeShell {
    invocations: AtomicUsize,
}

impl FakeShell {
    /// Create a fake shell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many commands reached the executor.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShellExecutor for FakeShell {
    async fn run(&self, program: &str, arguments: &str) -> Result<ShellOutput, ShellError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(ShellOutput {
            exit_code: 0,
            stdout: format!("{program} {arguments}\n"),
            stderr: String::new(),
        })
    }

    async fn run_command_line(&self, command_line: &str) -> Result<ShellOutput, ShellError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(ShellOutput {
            exit_code: 0,
            stdout: format!("{command_line}\n"),
            stderr: String::new(),
        })
    }
}

/// A mock capability provider spanning several command categories.
pub struct MockAutomation {
    shell_calls: AtomicUsize,
    input_calls: AtomicUsize,
}

impl MockAutomation {
    /// Create the mock provider.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            shell_calls: AtomicUsize::new(0),
            input_calls: AtomicUsize::new(0),
        })
    }

    /// How many shell commands actually executed.
    pub fn shell_calls(&self) -> usize {
        self.shell_calls.load(Ordering::SeqCst)
    }

    /// How many input-injection commands actually executed.
    pub fn input_calls(&self) -> usize {
        self.input_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CapabilityProvider for MockAutomation {
    fn declarations(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("shell.run", "Run a single command line")
                .mutating()
                .shell_like()
                .param(ParamSpec::required("command", ParamType::String, "Command line")),
            CommandSpec::new("shell.run_program", "Run a program with arguments")
                .mutating()
                .shell_like()
                .param(ParamSpec::required("program", ParamType::String, "Program name"))
                .param(ParamSpec::optional("arguments", ParamType::String, "Argument string")),
            CommandSpec::new("mouse.move", "Move the pointer")
                .mutating()
                .input_injecting()
                .param(ParamSpec::required("x", ParamType::Integer, "X coordinate"))
                .param(ParamSpec::required("y", ParamType::Integer, "Y coordinate")),
            CommandSpec::new("mouse.position", "Report the pointer position"),
            CommandSpec::new("keyboard.type", "Type text")
                .mutating()
                .input_injecting()
                .param(ParamSpec::required("text", ParamType::String, "Text to type"))
                .param(ParamSpec::optional("x", ParamType::Integer, "Target X"))
                .param(ParamSpec::optional("y", ParamType::Integer, "Target Y")),
            CommandSpec::new("clipboard.get", "Read clipboard text"),
            CommandSpec::new("window.wait_active", "Wait until a window is active")
                .param(ParamSpec::required("title", ParamType::String, "Window title")),
        ]
    }

    async fn invoke(
        &self,
        command: &str,
        args: &Map<String, Value>,
        ctx: &InvokeContext,
    ) -> Result<Value, ProviderError> {
        match command {
            "shell.run" | "shell.run_program" => {
                self.shell_calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!({"exit_code": 0, "stdout": "", "stderr": ""}))
            },
            "mouse.move" | "keyboard.type" => {
                self.input_calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!({"done": true}))
            },
            "mouse.position" => Ok(json!({"x": 120, "y": 240})),
            "clipboard.get" => Ok(json!({"text": "clipboard contents"})),
            "window.wait_active" => {
                // A long poll that observes the emergency stop.
                ctx.cancellation.cancelled().await;
                Err(ProviderError::Cancelled)
            },
            other => Err(ProviderError::Unsupported(other.to_string())),
        }
    }
}
