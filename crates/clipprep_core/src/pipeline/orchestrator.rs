//! Pipeline runner that sequences the ingestion stages.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use super::errors::{PipelineError, PipelineResult};
use super::types::{PipelineOutput, ProgressCallback, Stage};
use crate::config::Settings;
use crate::media::{extract_audio, probe_duration, sample_frames};
use crate::tools::{SystemToolRunner, ToolRunner};
use crate::workspace::{MediaInput, WorkspaceGuard, WorkspaceHandle};

/// Turns uploaded video bytes into audio and frame artifacts.
///
/// One `IngestPipeline` can serve any number of concurrent invocations:
/// each call gets its own workspace and its own processes, and the
/// pipeline itself holds no mutable state.
pub struct IngestPipeline {
    settings: Settings,
    runner: Arc<dyn ToolRunner>,
    progress_callback: Option<ProgressCallback>,
}

impl IngestPipeline {
    /// Create a pipeline that runs tools through `runner`.
    pub fn new(settings: Settings, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            settings,
            runner,
            progress_callback: None,
        }
    }

    /// Create a pipeline that spawns the real ffmpeg/ffprobe.
    pub fn with_system_tools(settings: Settings) -> Self {
        Self::new(settings, Arc::new(SystemToolRunner::new()))
    }

    /// Set the progress callback.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn enter(&self, stage: Stage) {
        tracing::info!("Stage: {}", stage);
        if let Some(ref callback) = self.progress_callback {
            callback(stage, stage.percent());
        }
    }

    /// Run the whole pipeline for one upload.
    ///
    /// Fails only if the workspace cannot be allocated or the upload cannot
    /// be written into it; in both cases no tool has been launched and no
    /// workspace is left behind. Every later problem degrades the output
    /// (`0.0` duration, no audio, fewer or no frames) instead.
    ///
    /// Dropping the returned future before it completes (for example under
    /// `tokio::time::timeout`) removes the workspace it was working in.
    pub async fn process_video(
        &self,
        bytes: &[u8],
        original_filename: &str,
    ) -> PipelineResult<PipelineOutput> {
        let id = Uuid::new_v4();
        let span = tracing::info_span!("ingest", id = %id);
        self.run(id, bytes, original_filename).instrument(span).await
    }

    async fn run(
        &self,
        id: Uuid,
        bytes: &[u8],
        original_filename: &str,
    ) -> PipelineResult<PipelineOutput> {
        if bytes.is_empty() {
            tracing::error!("Rejected empty upload {:?}", original_filename);
            return Err(PipelineError::invalid_input("upload is empty"));
        }

        let started_at = chrono::Local::now().to_rfc3339();
        let tools = &self.settings.tools;

        let handle = WorkspaceHandle::create(&self.settings.paths.workspace_root()).map_err(|e| {
            tracing::error!("Workspace allocation failed: {}", e);
            PipelineError::from(e)
        })?;
        // Removed on drop if this future is abandoned before returning
        let guard = WorkspaceGuard::new(handle);
        let workspace = guard.handle();
        self.enter(Stage::Created);

        let input = match MediaInput::write(workspace, bytes, original_filename).await {
            Ok(input) => input,
            Err(source) => {
                let err = PipelineError::input_write(
                    MediaInput::path_in(workspace, original_filename),
                    source,
                );
                tracing::error!("{}", err);
                guard.disarm().destroy().await;
                return Err(err);
            }
        };
        tracing::info!(
            "Wrote {} bytes from {:?} to {}",
            input.size(),
            original_filename,
            input.path().display()
        );
        self.enter(Stage::InputWritten);

        let duration = probe_duration(self.runner.as_ref(), &tools.ffprobe, input.path()).await;
        self.enter(Stage::Probed);

        let audio_path = workspace.file(&self.settings.audio.file_name);
        let audio = extract_audio(
            self.runner.as_ref(),
            &tools.ffmpeg,
            input.path(),
            &audio_path,
            &self.settings.audio,
        )
        .await;
        self.enter(Stage::AudioAttempted);

        let frames = sample_frames(
            self.runner.as_ref(),
            &tools.ffmpeg,
            input.path(),
            workspace.path(),
            duration,
            &self.settings.frames,
        )
        .await;
        self.enter(Stage::FramesSampled);

        tracing::info!(
            "Ingest complete: duration={:.3}s audio={} frames={}",
            duration,
            if audio.is_some() { "yes" } else { "no" },
            frames.len()
        );
        self.enter(Stage::Done);

        Ok(PipelineOutput {
            id,
            started_at,
            input,
            duration,
            audio,
            frames,
            workspace: guard.disarm(),
        })
    }
}
