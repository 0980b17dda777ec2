//! clipprep core - video ingestion pipeline
//!
//! Turns an uploaded video into a bounded set of transport-ready artifacts:
//! a compact speech audio track and up to four representative still frames.
//! All codec work is delegated to external media tools (ffmpeg/ffprobe);
//! this crate only orchestrates them inside a per-invocation workspace.
//!
//! This crate contains no CLI dependencies. It can be embedded in an
//! upload handler or driven by the `clipprep` binary.
//!
//! # Example
//!
//! ```no_run
//! use clipprep_core::config::Settings;
//! use clipprep_core::pipeline::IngestPipeline;
//!
//! # async fn run(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = IngestPipeline::with_system_tools(Settings::default());
//! let output = pipeline.process_video(&bytes, "clip.mov").await?;
//!
//! if let Some(audio) = output.encode_audio().await {
//!     println!("audio payload: {} chars", audio?.len());
//! }
//! for frame in output.encode_frames().await {
//!     println!("frame payload: {} chars", frame?.len());
//! }
//!
//! output.cleanup().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod logging;
pub mod media;
pub mod pipeline;
pub mod tools;
pub mod workspace;

#[cfg(test)]
pub(crate) mod testing;

pub use pipeline::{cleanup_workspace, IngestPipeline, PipelineError, PipelineOutput};
pub use workspace::WorkspaceHandle;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
