//! Scripted tool runner for tests.
//!
//! Simulates ffprobe/ffmpeg by inspecting the command and writing (or not
//! writing) the output file, and records every command it was given.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::tools::{ToolCommand, ToolOutcome, ToolRunner};

/// What the fake does for one extraction command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeWrite {
    /// Exit 0 after writing this many bytes to the output path.
    Bytes(usize),
    /// Exit 0 without writing anything.
    Nothing,
    /// Exit 1 without writing anything.
    Fail,
    /// Report that the executable could not be launched.
    Unlaunchable,
}

type FrameScript = dyn Fn(Option<f64>) -> FakeWrite + Send + Sync;

pub struct FakeRunner {
    probe: ToolOutcome,
    audio: FakeWrite,
    frame: Box<FrameScript>,
    calls: Mutex<Vec<ToolCommand>>,
}

impl FakeRunner {
    /// Healthy tools for a file of `duration` seconds with an audio track.
    pub fn healthy(duration: f64) -> Self {
        Self {
            probe: ToolOutcome::Success {
                stdout: format!("{}\n", duration),
                stderr: String::new(),
            },
            audio: FakeWrite::Bytes(4096),
            frame: Box::new(|_| FakeWrite::Bytes(2048)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_probe(mut self, outcome: ToolOutcome) -> Self {
        self.probe = outcome;
        self
    }

    pub fn with_probe_stdout(self, stdout: &str) -> Self {
        self.with_probe(ToolOutcome::Success {
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    pub fn with_audio(mut self, audio: FakeWrite) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_frames<F>(mut self, script: F) -> Self
    where
        F: Fn(Option<f64>) -> FakeWrite + Send + Sync + 'static,
    {
        self.frame = Box::new(script);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().clone()
    }

    /// Seek offsets of every frame command, `None` for unseeked ones.
    pub fn frame_seeks(&self) -> Vec<Option<f64>> {
        self.calls()
            .iter()
            .filter(|c| is_frame(c))
            .map(seek_of)
            .collect()
    }
}

pub fn is_probe(cmd: &ToolCommand) -> bool {
    cmd.value_of("-show_entries").is_some()
}

pub fn is_audio(cmd: &ToolCommand) -> bool {
    cmd.args_lossy().iter().any(|a| a == "-vn")
}

pub fn is_frame(cmd: &ToolCommand) -> bool {
    cmd.value_of("-frames:v").is_some()
}

fn seek_of(cmd: &ToolCommand) -> Option<f64> {
    cmd.value_of("-ss").and_then(|s| s.parse().ok())
}

fn apply(write: FakeWrite, cmd: &ToolCommand) -> ToolOutcome {
    let output = cmd.last_arg().map(PathBuf::from);
    match write {
        FakeWrite::Bytes(n) => {
            if let Some(path) = output {
                std::fs::write(path, vec![0u8; n]).unwrap();
            }
            ToolOutcome::Success {
                stdout: String::new(),
                stderr: String::new(),
            }
        }
        FakeWrite::Nothing => ToolOutcome::Success {
            stdout: String::new(),
            stderr: String::new(),
        },
        FakeWrite::Fail => ToolOutcome::ExitFailure {
            code: 1,
            stderr: "simulated failure\n".to_string(),
        },
        FakeWrite::Unlaunchable => ToolOutcome::LaunchFailure {
            reason: "No such file or directory (os error 2)".to_string(),
        },
    }
}

#[async_trait]
impl ToolRunner for FakeRunner {
    async fn run(&self, command: &ToolCommand) -> ToolOutcome {
        self.calls.lock().push(command.clone());

        if is_probe(command) {
            self.probe.clone()
        } else if is_audio(command) {
            apply(self.audio, command)
        } else if is_frame(command) {
            apply((self.frame)(seek_of(command)), command)
        } else {
            panic!("unexpected command: {}", command);
        }
    }
}
