//! clipprep - command-line driver for the ingestion pipeline
//!
//! Runs one pipeline invocation against a local video file, the same way
//! an upload handler would, and prints what was produced.
//!
//! Usage:
//!   clipprep clip.mp4
//!   clipprep --json clip.mp4 > payload.json
//!   clipprep --keep --verbose clip.mov

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Parser;
use serde::Serialize;

use clipprep_core::config::ConfigManager;
use clipprep_core::logging::{self, LogLevel};
use clipprep_core::pipeline::{IngestPipeline, PipelineOutput, PipelineSummary};

#[derive(Parser)]
#[command(
    name = "clipprep",
    version,
    about = "Extract a speech audio track and sample still frames from a video",
    after_help = "EXAMPLES:\n  \
                  clipprep clip.mp4\n  \
                  clipprep --json clip.mp4 > payload.json\n  \
                  clipprep --config ./clipprep.toml --keep clip.mov"
)]
struct Cli {
    /// Video file to process
    video: PathBuf,

    /// Settings file (created with defaults if missing)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the base64 payloads as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Leave the workspace on disk after printing
    #[arg(long)]
    keep: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// JSON payload as it would be sent to an analysis service.
#[derive(Serialize)]
struct Payload {
    #[serde(flatten)]
    summary: PipelineSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_base64: Option<String>,
    frames_base64: Vec<String>,
}

fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "clipprep")
        .map(|dirs| dirs.config_dir().join("clipprep.toml"))
        .unwrap_or_else(|| PathBuf::from(".config").join("clipprep.toml"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = ConfigManager::new(&config_path);
    config
        .load_or_create()
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    let settings = config.into_settings();

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        settings.logging.level
    };
    let _log_guard = match settings.logging.log_dir() {
        Some(dir) => Some(
            logging::init_tracing_with_file(level, &dir)
                .with_context(|| format!("Failed to open log directory {}", dir.display()))?,
        ),
        None => {
            logging::init_tracing(level);
            None
        }
    };

    let bytes = tokio::fs::read(&cli.video)
        .await
        .with_context(|| format!("Failed to read {}", cli.video.display()))?;
    let filename = file_name(&cli.video);

    let pipeline = IngestPipeline::with_system_tools(settings);
    let output = pipeline
        .process_video(&bytes, &filename)
        .await
        .with_context(|| format!("Could not process {}", cli.video.display()))?;

    let printed = if cli.json {
        print_json(&output).await
    } else {
        print_summary(&output);
        Ok(())
    };

    if cli.keep {
        eprintln!("Workspace kept at {}", output.workspace().path().display());
    } else {
        output.cleanup().await;
    }

    printed
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn print_summary(output: &PipelineOutput) {
    let duration = if output.duration() > 0.0 {
        format!("{:.3}s", output.duration())
    } else {
        "unknown".to_string()
    };

    println!("Duration: {}", duration);
    match output.audio() {
        Some(path) => println!("Audio:    {}", path.display()),
        None => println!("Audio:    none"),
    }
    println!("Frames:   {}", output.frames().len());
    for frame in output.frames() {
        println!("  {}", frame.display());
    }
}

async fn print_json(output: &PipelineOutput) -> Result<()> {
    let audio_base64 = match output.encode_audio().await {
        Some(Ok(encoded)) => Some(encoded),
        Some(Err(e)) => {
            tracing::warn!("Skipping audio: {}", e);
            None
        }
        None => None,
    };

    let mut frames_base64 = Vec::new();
    for encoded in output.encode_frames().await {
        match encoded {
            Ok(frame) => frames_base64.push(frame),
            Err(e) => tracing::warn!("Skipping frame: {}", e),
        }
    }

    let payload = Payload {
        summary: output.summary(),
        audio_base64,
        frames_base64,
    };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
