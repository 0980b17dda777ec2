//! Configuration management for clipprep.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Missing sections appended in place, keeping hand edits and comments
//! - Defaults for every key, so partial files are valid
//! - Validation of values the pipeline cannot work with
//!
//! # Example
//!
//! ```no_run
//! use clipprep_core::config::ConfigManager;
//!
//! let mut config = ConfigManager::new(".config/clipprep.toml");
//! config.load_or_create().unwrap();
//!
//! println!("ffmpeg: {}", config.settings().tools.ffmpeg);
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    AudioSettings, ConfigSection, FrameSettings, InvalidSetting, LoggingSettings, PathSettings,
    Settings, ToolSettings, DEFAULT_SECONDS_PER_FRAME, DEFAULT_UNKNOWN_INTERVAL_SECS,
};
