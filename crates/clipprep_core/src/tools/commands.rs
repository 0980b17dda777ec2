//! Argument templates for ffprobe and ffmpeg.
//!
//! The exact flags bind the pipeline to the ffmpeg family of tools. Each
//! builder takes its tunables from settings; with default settings the
//! templates are:
//!
//! ```text
//! ffprobe -v error -show_entries format=duration -of default=noprint_wrappers=1:nokey=1 <in>
//! ffmpeg -y -i <in> -vn -ac 1 -ar 16000 -c:a libmp3lame -q:a 9 <out>
//! ffmpeg -y [-ss <t>] -i <in> -frames:v 1 -q:v 2 <out>
//! ```

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::Path;

use crate::config::{AudioSettings, FrameSettings};

/// A program plus its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument (builder pattern).
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments as lossy strings, for logging and matching.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Value following `flag`, if present.
    pub fn value_of(&self, flag: &str) -> Option<String> {
        let args = self.args_lossy();
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1).cloned())
    }

    /// Last argument, which is the output path for ffmpeg commands.
    pub fn last_arg(&self) -> Option<&OsStr> {
        self.args.last().map(OsString::as_os_str)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Query only the container-level duration, printed as a bare number.
pub fn probe_duration(ffprobe: &str, input: &Path) -> ToolCommand {
    ToolCommand::new(ffprobe)
        .arg("-v")
        .arg("error")
        .arg("-show_entries")
        .arg("format=duration")
        .arg("-of")
        .arg("default=noprint_wrappers=1:nokey=1")
        .arg(input)
}

/// Strip video and transcode to compact speech audio, overwriting `output`.
pub fn extract_audio(ffmpeg: &str, input: &Path, output: &Path, audio: &AudioSettings) -> ToolCommand {
    ToolCommand::new(ffmpeg)
        .arg("-y")
        .arg("-i")
        .arg(input)
        .arg("-vn")
        .arg("-ac")
        .arg(audio.channels.to_string())
        .arg("-ar")
        .arg(audio.sample_rate.to_string())
        .arg("-c:a")
        .arg(&audio.codec)
        .arg("-q:a")
        .arg(audio.quality.to_string())
        .arg(output)
}

/// Extract one still image, seeking to `timestamp` seconds when given.
///
/// `-ss` goes before `-i` so ffmpeg seeks on the demuxer instead of
/// decoding everything up to the timestamp.
pub fn extract_frame(
    ffmpeg: &str,
    input: &Path,
    timestamp: Option<f64>,
    output: &Path,
    frames: &FrameSettings,
) -> ToolCommand {
    let mut cmd = ToolCommand::new(ffmpeg).arg("-y");
    if let Some(t) = timestamp {
        cmd = cmd.arg("-ss").arg(format_timestamp(t));
    }
    cmd.arg("-i")
        .arg(input)
        .arg("-frames:v")
        .arg("1")
        .arg("-q:v")
        .arg(frames.image_quality.to_string())
        .arg(output)
}

/// Seconds with millisecond precision.
pub fn format_timestamp(seconds: f64) -> String {
    format!("{:.3}", seconds)
}
