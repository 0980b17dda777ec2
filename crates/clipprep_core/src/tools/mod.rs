//! External tool invocation.
//!
//! - **Commands**: fixed ffprobe/ffmpeg argument templates
//! - **Runner**: spawns a process, captures both streams, maps exit status
//!   to a [`ToolOutcome`]
//!
//! Outcomes are values, not errors. Callers match on them and decide
//! whether a failure is absorbed or propagated; `into_result` is there for
//! callers that want `?`.

pub mod commands;
mod runner;
mod types;

pub use commands::ToolCommand;
pub use runner::{SystemToolRunner, ToolRunner};
pub use types::{last_line, ToolError, ToolOutcome, ToolOutput, ToolResult};
