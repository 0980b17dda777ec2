//! Running external commands.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::commands::ToolCommand;
use super::types::ToolOutcome;

/// Runs an external command to completion and reports how it ended.
///
/// This is the seam between the pipeline and the operating system; tests
/// substitute a scripted implementation.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run `command`, capturing stdout and stderr fully before returning.
    ///
    /// Never retries. One call spawns at most one process.
    async fn run(&self, command: &ToolCommand) -> ToolOutcome;
}

/// Runs commands as real child processes via tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemToolRunner;

impl SystemToolRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolRunner for SystemToolRunner {
    async fn run(&self, command: &ToolCommand) -> ToolOutcome {
        tracing::debug!("Running: {}", command);

        let mut cmd = Command::new(command.program());
        cmd.args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) => {
                return ToolOutcome::LaunchFailure {
                    reason: e.to_string(),
                };
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            ToolOutcome::Success { stdout, stderr }
        } else {
            ToolOutcome::ExitFailure {
                code: output.status.code().unwrap_or(-1),
                stderr,
            }
        }
    }
}
