//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Defaults reproduce the pipeline's built-in constants, so an empty file
//! behaves exactly like no file at all. [`Settings::validate`] rejects
//! values the pipeline cannot work with.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogLevel;

/// Default spacing of sampled frames over known-length content.
pub const DEFAULT_SECONDS_PER_FRAME: f64 = 5.0;

/// Default spacing of sampled frames when the duration is unknown.
pub const DEFAULT_UNKNOWN_INTERVAL_SECS: f64 = 1.0;

/// A setting whose value the pipeline cannot use.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{key}: {reason}")]
pub struct InvalidSetting {
    /// Dotted key, e.g. `frames.max_frames`.
    pub key: &'static str,
    pub reason: String,
}

impl InvalidSetting {
    fn new(key: &'static str, reason: impl Into<String>) -> Self {
        Self {
            key,
            reason: reason.into(),
        }
    }
}

fn positive_seconds(key: &'static str, value: f64) -> Result<(), InvalidSetting> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InvalidSetting::new(
            key,
            format!("must be a positive number of seconds, got {}", value),
        ))
    }
}

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Audio extraction parameters.
    #[serde(default)]
    pub audio: AudioSettings,

    /// Frame sampling parameters.
    #[serde(default)]
    pub frames: FrameSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Check the values that would break extraction or sampling.
    ///
    /// Missing keys never fail here; they already hold their defaults.
    pub fn validate(&self) -> Result<(), InvalidSetting> {
        let audio = &self.audio;
        if audio.sample_rate == 0 {
            return Err(InvalidSetting::new("audio.sample_rate", "must be at least 1 Hz"));
        }
        if audio.channels == 0 {
            return Err(InvalidSetting::new("audio.channels", "must be at least 1"));
        }
        if audio.file_name.is_empty() || audio.file_name.contains(['/', '\\']) {
            return Err(InvalidSetting::new(
                "audio.file_name",
                format!("must be a plain file name, got {:?}", audio.file_name),
            ));
        }

        let frames = &self.frames;
        positive_seconds("frames.seconds_per_frame", frames.seconds_per_frame)?;
        positive_seconds("frames.unknown_interval_secs", frames.unknown_interval_secs)?;
        if frames.max_frames == 0 {
            return Err(InvalidSetting::new("frames.max_frames", "must be at least 1"));
        }
        if frames.extension.is_empty() || !frames.extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InvalidSetting::new(
                "frames.extension",
                format!("must be alphanumeric without a dot, got {:?}", frames.extension),
            ));
        }

        Ok(())
    }
}

/// Sections of the settings file, one TOML table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Tools,
    Audio,
    Frames,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 5] = [
        ConfigSection::Paths,
        ConfigSection::Tools,
        ConfigSection::Audio,
        ConfigSection::Frames,
        ConfigSection::Logging,
    ];

    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Tools => "tools",
            ConfigSection::Audio => "audio",
            ConfigSection::Frames => "frames",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section in generated files.
    pub(crate) fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "# Working directories",
            ConfigSection::Tools => "# External media tools",
            ConfigSection::Audio => "# Speech audio extraction",
            ConfigSection::Frames => "# Still frame sampling",
            ConfigSection::Logging => "# Logging configuration",
        }
    }
}

/// Path configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathSettings {
    /// Root folder under which per-invocation workspaces are created.
    /// Empty means the system temp directory.
    #[serde(default)]
    pub temp_root: String,
}

impl PathSettings {
    /// Resolve the workspace root directory.
    pub fn workspace_root(&self) -> PathBuf {
        if self.temp_root.trim().is_empty() {
            std::env::temp_dir()
        } else {
            PathBuf::from(&self.temp_root)
        }
    }
}

/// Names or paths of the external tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Transcoder used for audio and frame extraction.
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    /// Prober used for duration queries.
    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

/// Audio extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Output sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Output channel count (1 = mono).
    #[serde(default = "default_channels")]
    pub channels: u32,

    /// Encoder passed to `-c:a`.
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Fixed VBR quality passed to `-q:a`.
    #[serde(default = "default_audio_quality")]
    pub quality: u32,

    /// File name of the audio artifact inside the workspace.
    #[serde(default = "default_audio_file_name")]
    pub file_name: String,

    /// Outputs at or below this size are treated as "no usable audio".
    #[serde(default = "default_min_size_bytes")]
    pub min_size_bytes: u64,
}

fn default_sample_rate() -> u32 {
    16_000
}

fn default_channels() -> u32 {
    1
}

fn default_codec() -> String {
    "libmp3lame".to_string()
}

fn default_audio_quality() -> u32 {
    9
}

fn default_audio_file_name() -> String {
    "audio.mp3".to_string()
}

fn default_min_size_bytes() -> u64 {
    1000
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            codec: default_codec(),
            quality: default_audio_quality(),
            file_name: default_audio_file_name(),
            min_size_bytes: default_min_size_bytes(),
        }
    }
}

/// Frame sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSettings {
    /// Roughly one frame is sampled per this many seconds of content.
    #[serde(default = "default_seconds_per_frame")]
    pub seconds_per_frame: f64,

    /// Upper bound on sampled frames, regardless of length.
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,

    /// Spacing between timestamps when the duration is unknown.
    #[serde(default = "default_unknown_interval")]
    pub unknown_interval_secs: f64,

    /// JPEG quality passed to `-q:v` (2 = best, 31 = worst).
    #[serde(default = "default_image_quality")]
    pub image_quality: u32,

    /// Image file extension (selects the encoder).
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_seconds_per_frame() -> f64 {
    DEFAULT_SECONDS_PER_FRAME
}

fn default_max_frames() -> usize {
    4
}

fn default_unknown_interval() -> f64 {
    DEFAULT_UNKNOWN_INTERVAL_SECS
}

fn default_image_quality() -> u32 {
    2
}

fn default_extension() -> String {
    "jpg".to_string()
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            seconds_per_frame: default_seconds_per_frame(),
            max_frames: default_max_frames(),
            unknown_interval_secs: default_unknown_interval(),
            image_quality: default_image_quality(),
            extension: default_extension(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Directory for rolling log files. Empty means stderr only.
    #[serde(default)]
    pub log_dir: String,
}

impl LoggingSettings {
    /// Log directory, if file logging is enabled.
    pub fn log_dir(&self) -> Option<PathBuf> {
        if self.log_dir.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.log_dir))
        }
    }
}
