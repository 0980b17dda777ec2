//! Ingestion pipeline orchestrator.
//!
//! Sequences the media stages inside a fresh workspace and hands the
//! results, together with the workspace, to the caller.
//!
//! # Architecture
//!
//! ```text
//! IngestPipeline::process_video(bytes, filename)
//!     ├── Created         allocate workspace          (fatal on error)
//!     ├── InputWritten    write input<ext>            (fatal on error)
//!     ├── Probed          ffprobe duration            (0.0 on error)
//!     ├── AudioAttempted  ffmpeg → audio.mp3          (None on error)
//!     ├── FramesSampled   ffmpeg → frame_N.jpg        (fewer/none on error)
//!     └── Done
//! ```
//!
//! The caller owns the returned [`PipelineOutput`] and must release its
//! workspace with [`cleanup_workspace`] or [`PipelineOutput::cleanup`].

mod errors;
mod orchestrator;
mod types;

pub use errors::{PipelineError, PipelineResult};
pub use orchestrator::IngestPipeline;
pub use types::{PipelineOutput, PipelineSummary, ProgressCallback, Stage};

use crate::workspace::WorkspaceHandle;

/// Remove a workspace once its artifacts are no longer needed.
///
/// Best-effort and idempotent: errors are logged, never returned, and
/// calling it again on the same handle is a no-op.
pub async fn cleanup_workspace(handle: &WorkspaceHandle) {
    handle.destroy().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn cleanup_twice_never_raises() {
        let root = tempdir().unwrap();
        let ws = WorkspaceHandle::create(root.path()).unwrap();
        std::fs::write(ws.file("audio.mp3"), vec![0u8; 2000]).unwrap();

        cleanup_workspace(&ws).await;
        assert!(!ws.exists());

        cleanup_workspace(&ws).await;
        assert!(!ws.exists());
    }
}
