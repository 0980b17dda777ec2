//! Core types for the ingestion pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::media::{encode_file, EncodeResult};
use crate::workspace::{MediaInput, WorkspaceHandle};

/// Progress callback type for reporting pipeline progress.
///
/// Arguments: (stage, percent_complete)
pub type ProgressCallback = Box<dyn Fn(Stage, u32) + Send + Sync>;

/// Pipeline stages, in the only order they can occur.
///
/// The pipeline never moves backwards. A stage whose work failed softly
/// still advances to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Created,
    InputWritten,
    Probed,
    AudioAttempted,
    FramesSampled,
    Done,
}

impl Stage {
    /// Rough completion percentage at this stage.
    pub fn percent(self) -> u32 {
        match self {
            Stage::Created => 0,
            Stage::InputWritten => 10,
            Stage::Probed => 20,
            Stage::AudioAttempted => 50,
            Stage::FramesSampled => 90,
            Stage::Done => 100,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Created => "Created",
            Stage::InputWritten => "InputWritten",
            Stage::Probed => "Probed",
            Stage::AudioAttempted => "AudioAttempted",
            Stage::FramesSampled => "FramesSampled",
            Stage::Done => "Done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything one invocation produced.
///
/// Owned by the caller, who must call [`cleanup`](Self::cleanup) (or
/// [`cleanup_workspace`](super::cleanup_workspace)) once the artifacts have
/// been consumed. Nothing is removed automatically.
#[derive(Debug)]
pub struct PipelineOutput {
    pub(crate) id: Uuid,
    pub(crate) started_at: String,
    pub(crate) input: MediaInput,
    pub(crate) duration: f64,
    pub(crate) audio: Option<PathBuf>,
    pub(crate) frames: Vec<PathBuf>,
    pub(crate) workspace: WorkspaceHandle,
}

impl PipelineOutput {
    /// Invocation id (also used in log spans).
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Probed duration in seconds; `0.0` means unknown.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Audio artifact, if one usable track was produced.
    pub fn audio(&self) -> Option<&Path> {
        self.audio.as_deref()
    }

    /// Frame artifacts in ascending timestamp order (0 to 4 entries).
    pub fn frames(&self) -> &[PathBuf] {
        &self.frames
    }

    /// The input copy inside the workspace.
    pub fn input(&self) -> &MediaInput {
        &self.input
    }

    pub fn workspace(&self) -> &WorkspaceHandle {
        &self.workspace
    }

    /// Base64 of the audio artifact, `None` when there is no audio.
    pub async fn encode_audio(&self) -> Option<EncodeResult<String>> {
        match &self.audio {
            Some(path) => Some(encode_file(path).await),
            None => None,
        }
    }

    /// Base64 of every frame, in order. Each frame succeeds or fails on its own.
    pub async fn encode_frames(&self) -> Vec<EncodeResult<String>> {
        let mut encoded = Vec::with_capacity(self.frames.len());
        for frame in &self.frames {
            encoded.push(encode_file(frame).await);
        }
        encoded
    }

    /// Serializable description of this output.
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            id: self.id,
            started_at: self.started_at.clone(),
            duration_secs: self.duration,
            audio: self.audio.clone(),
            frames: self.frames.clone(),
            workspace: self.workspace.path().to_path_buf(),
        }
    }

    /// Remove the workspace and all artifacts in it. Never fails.
    pub async fn cleanup(self) {
        super::cleanup_workspace(&self.workspace).await;
    }
}

/// Plain-data view of a [`PipelineOutput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub id: Uuid,
    pub started_at: String,
    pub duration_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<PathBuf>,
    pub frames: Vec<PathBuf>,
    pub workspace: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_grows_with_stage_order() {
        let stages = [
            Stage::Created,
            Stage::InputWritten,
            Stage::Probed,
            Stage::AudioAttempted,
            Stage::FramesSampled,
            Stage::Done,
        ];
        for pair in stages.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].percent() < pair[1].percent());
        }
        assert_eq!(Stage::Done.percent(), 100);
    }

    #[test]
    fn summary_serializes() {
        let summary = PipelineSummary {
            id: Uuid::nil(),
            started_at: "2026-01-01T00:00:00+00:00".to_string(),
            duration_secs: 12.0,
            audio: None,
            frames: vec![PathBuf::from("/ws/frame_1.jpg")],
            workspace: PathBuf::from("/ws"),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"duration_secs\":12.0"));
        assert!(!json.contains("\"audio\""));
        assert!(json.contains("frame_1.jpg"));
    }
}
