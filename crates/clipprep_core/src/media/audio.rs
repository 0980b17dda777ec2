//! Speech audio extraction via ffmpeg.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::AudioSettings;
use crate::tools::{commands, ToolOutcome, ToolRunner};

/// Why no usable audio artifact was produced.
///
/// Callers only see `None`; the cause is logged so a missing audio track
/// can be told apart from a broken tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoUsableAudio {
    /// ffmpeg exited non-zero.
    ToolFailed { code: i32, detail: String },
    /// ffmpeg could not be started.
    LaunchFailed(String),
    /// ffmpeg succeeded but the output file does not exist.
    Missing,
    /// Output exists but is at or below the minimum size (typically no audio track).
    Undersized { size: u64, min: u64 },
}

impl fmt::Display for NoUsableAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoUsableAudio::ToolFailed { code, detail } => {
                write!(f, "transcoder exited with code {}: {}", code, detail)
            }
            NoUsableAudio::LaunchFailed(reason) => write!(f, "transcoder did not start: {}", reason),
            NoUsableAudio::Missing => write!(f, "transcoder produced no output file"),
            NoUsableAudio::Undersized { size, min } => {
                write!(f, "output is {} bytes (minimum {}); likely no audio track", size, min)
            }
        }
    }
}

/// Transcode the audio of `input` into `output`.
///
/// Returns the output path only when the tool succeeded and the file is
/// larger than `settings.min_size_bytes`. Every other case is `None`.
pub async fn extract_audio(
    runner: &dyn ToolRunner,
    ffmpeg: &str,
    input: &Path,
    output: &Path,
    settings: &AudioSettings,
) -> Option<PathBuf> {
    match try_extract_audio(runner, ffmpeg, input, output, settings).await {
        Ok(path) => {
            tracing::debug!("Audio extracted to {}", path.display());
            Some(path)
        }
        Err(cause @ NoUsableAudio::Undersized { .. }) => {
            tracing::info!("No usable audio: {}", cause);
            None
        }
        Err(cause) => {
            tracing::warn!("No usable audio: {}", cause);
            None
        }
    }
}

/// Like [`extract_audio`], but keeps the reason for a missing artifact.
pub async fn try_extract_audio(
    runner: &dyn ToolRunner,
    ffmpeg: &str,
    input: &Path,
    output: &Path,
    settings: &AudioSettings,
) -> Result<PathBuf, NoUsableAudio> {
    let command = commands::extract_audio(ffmpeg, input, output, settings);

    match runner.run(&command).await {
        ToolOutcome::Success { .. } => {}
        ToolOutcome::ExitFailure { code, stderr } => {
            return Err(NoUsableAudio::ToolFailed {
                code,
                detail: crate::tools::last_line(&stderr).unwrap_or_default().to_string(),
            });
        }
        ToolOutcome::LaunchFailure { reason } => return Err(NoUsableAudio::LaunchFailed(reason)),
    }

    let size = match tokio::fs::metadata(output).await {
        Ok(meta) => meta.len(),
        Err(_) => return Err(NoUsableAudio::Missing),
    };

    if size <= settings.min_size_bytes {
        return Err(NoUsableAudio::Undersized {
            size,
            min: settings.min_size_bytes,
        });
    }

    Ok(output.to_path_buf())
}
