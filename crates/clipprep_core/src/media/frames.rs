//! Still frame sampling via ffmpeg.
//!
//! Roughly one frame per `seconds_per_frame` of content, at least one and
//! at most `max_frames`, evenly spaced strictly inside the duration:
//!
//! ```text
//! count    = clamp(floor(d / 5) + 1, 1, 4)
//! interval = d / (count + 1)        (d > 0)
//!          = 1s                     (d unknown)
//! t_i      = interval * i           for i in 1..=count
//! ```
//!
//! Every extraction failure is absorbed. If no frame at all could be
//! produced, one last attempt grabs the very first frame without seeking.

use std::path::{Path, PathBuf};

use crate::config::{FrameSettings, DEFAULT_SECONDS_PER_FRAME, DEFAULT_UNKNOWN_INTERVAL_SECS};
use crate::tools::{commands, ToolOutcome, ToolRunner};

/// File stem of sampled frames; the fallback frame uses index 0.
pub const FRAME_STEM: &str = "frame_";

/// Treat negative, NaN and infinite durations as unknown.
fn known_duration(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}

/// `value` if it is a usable positive spacing, `fallback` otherwise.
///
/// Loaded settings are validated already; this covers settings built in code.
fn spacing_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Number of frames to request for a duration in seconds.
pub fn frame_count(duration: f64, settings: &FrameSettings) -> usize {
    let max = settings.max_frames.max(1);
    let duration = known_duration(duration);
    let seconds_per_frame = spacing_or(settings.seconds_per_frame, DEFAULT_SECONDS_PER_FRAME);

    // Saturating float-to-int cast keeps huge durations in range
    let by_length = (duration / seconds_per_frame).floor() as usize;
    by_length.saturating_add(1).clamp(1, max)
}

/// Ascending seek offsets for a duration in seconds.
///
/// With a known duration every offset is strictly inside `(0, duration)`.
pub fn sample_timestamps(duration: f64, settings: &FrameSettings) -> Vec<f64> {
    let count = frame_count(duration, settings);
    let duration = known_duration(duration);

    let interval = if duration > 0.0 {
        duration / (count as f64 + 1.0)
    } else {
        spacing_or(settings.unknown_interval_secs, DEFAULT_UNKNOWN_INTERVAL_SECS)
    };

    (1..=count).map(|i| interval * i as f64).collect()
}

/// Output path of the frame with the given index.
pub fn frame_path(dir: &Path, index: usize, settings: &FrameSettings) -> PathBuf {
    dir.join(format!("{}{}.{}", FRAME_STEM, index, settings.extension))
}

/// Extract frames from `input` into `dir`.
///
/// Returns the produced files in ascending timestamp order; may be empty.
pub async fn sample_frames(
    runner: &dyn ToolRunner,
    ffmpeg: &str,
    input: &Path,
    dir: &Path,
    duration: f64,
    settings: &FrameSettings,
) -> Vec<PathBuf> {
    let timestamps = sample_timestamps(duration, settings);
    tracing::debug!(
        "Sampling {} frame(s) at {:?}",
        timestamps.len(),
        timestamps
    );

    let mut frames = Vec::with_capacity(timestamps.len());

    for (i, &t) in timestamps.iter().enumerate() {
        let output = frame_path(dir, i + 1, settings);
        if extract_one(runner, ffmpeg, input, Some(t), &output, settings).await {
            frames.push(output);
        }
    }

    if frames.is_empty() {
        tracing::warn!("No frames extracted at sampled offsets; trying first frame");
        let output = frame_path(dir, 0, settings);
        if extract_one(runner, ffmpeg, input, None, &output, settings).await {
            frames.push(output);
        } else {
            tracing::warn!("Fallback frame extraction failed; continuing without frames");
        }
    }

    frames
}

/// Run one extraction; true if a non-empty image was written.
async fn extract_one(
    runner: &dyn ToolRunner,
    ffmpeg: &str,
    input: &Path,
    timestamp: Option<f64>,
    output: &Path,
    settings: &FrameSettings,
) -> bool {
    let command = commands::extract_frame(ffmpeg, input, timestamp, output, settings);
    let at = timestamp
        .map(commands::format_timestamp)
        .unwrap_or_else(|| "start".to_string());

    let outcome = runner.run(&command).await;
    if let ToolOutcome::Success { .. } = outcome {
        // Seeking past the end exits 0 without writing anything
        match tokio::fs::metadata(output).await {
            Ok(meta) if meta.len() > 0 => true,
            _ => {
                tracing::warn!("Frame at {} produced no image", at);
                false
            }
        }
    } else {
        tracing::warn!(
            "Frame at {} failed: {}",
            at,
            outcome.failure_summary().unwrap_or_default()
        );
        false
    }
}
