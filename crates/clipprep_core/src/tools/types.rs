//! Outcome and error types for external tool invocations.

use thiserror::Error;

/// Captured output of a tool that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Result of running one external command.
///
/// Kept as a plain sum type so each call site decides explicitly which
/// failures it absorbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Process exited with status zero.
    Success { stdout: String, stderr: String },
    /// Process ran but exited non-zero (or was killed by a signal, code -1).
    ExitFailure { code: i32, stderr: String },
    /// Process could not be started at all.
    LaunchFailure { reason: String },
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }

    /// Convert into a `Result`, naming the tool in launch errors.
    pub fn into_result(self, tool: &str) -> ToolResult<ToolOutput> {
        match self {
            ToolOutcome::Success { stdout, stderr } => Ok(ToolOutput { stdout, stderr }),
            ToolOutcome::ExitFailure { code, stderr } => Err(ToolError::ToolFailure {
                tool: tool.to_string(),
                exit_code: code,
                stderr,
            }),
            ToolOutcome::LaunchFailure { reason } => Err(ToolError::ToolLaunchFailure {
                tool: tool.to_string(),
                reason,
            }),
        }
    }

    /// One-line description of a failure, for logs.
    pub fn failure_summary(&self) -> Option<String> {
        match self {
            ToolOutcome::Success { .. } => None,
            ToolOutcome::ExitFailure { code, stderr } => Some(format!(
                "exit code {}: {}",
                code,
                last_line(stderr).unwrap_or("<no stderr>")
            )),
            ToolOutcome::LaunchFailure { reason } => Some(format!("launch failed: {}", reason)),
        }
    }
}

/// Last non-empty line of tool output.
///
/// ffmpeg prints its banner first and the actual error last.
pub fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}

/// Error from an external tool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// The process exited with a non-zero status.
    #[error("{tool} failed with exit code {exit_code}: {stderr}")]
    ToolFailure {
        tool: String,
        exit_code: i32,
        stderr: String,
    },

    /// The executable could not be started (not found, not executable).
    #[error("Failed to launch {tool}: {reason}")]
    ToolLaunchFailure { tool: String, reason: String },
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_converts_to_output() {
        let outcome = ToolOutcome::Success {
            stdout: "12.5\n".to_string(),
            stderr: String::new(),
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.failure_summary(), None);

        let output = outcome.into_result("ffprobe").unwrap();
        assert_eq!(output.stdout, "12.5\n");
    }

    #[test]
    fn exit_failure_displays_context() {
        let outcome = ToolOutcome::ExitFailure {
            code: 1,
            stderr: "ffmpeg version 6\ninput.mp4: Invalid data found\n".to_string(),
        };
        assert_eq!(
            outcome.failure_summary().unwrap(),
            "exit code 1: input.mp4: Invalid data found"
        );

        let err = outcome.into_result("ffmpeg").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("exit code 1"));
    }

    #[test]
    fn launch_failure_names_tool() {
        let err = ToolOutcome::LaunchFailure {
            reason: "No such file or directory".to_string(),
        }
        .into_result("ffprobe")
        .unwrap_err();
        assert!(matches!(err, ToolError::ToolLaunchFailure { ref tool, .. } if tool == "ffprobe"));
    }

    #[test]
    fn last_line_skips_blank_trailer() {
        assert_eq!(last_line("a\nb\n\n  \n"), Some("b"));
        assert_eq!(last_line(""), None);
    }
}
