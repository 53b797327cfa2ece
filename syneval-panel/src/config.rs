//! Configuration for the evaluation panel
//!
//! A minimal TOML bootstrap config: task file location, playback timing,
//! event channel sizing, logging. Everything except the task file path has a
//! built-in default so an empty table is a valid config.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use syneval_common::config::LoggingConfig;

/// Panel configuration loaded from a TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    /// Path to the JSON task list
    pub tasks_path: PathBuf,

    /// Pause between clips during sequential playback, in milliseconds
    #[serde(default = "default_inter_clip_delay_ms")]
    pub inter_clip_delay_ms: u64,

    /// Event bus channel capacity
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Simulated clip length for the demo binary, in milliseconds
    #[serde(default = "default_clip_duration_ms")]
    pub clip_duration_ms: u64,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_inter_clip_delay_ms() -> u64 {
    300
}

fn default_event_capacity() -> usize {
    100
}

fn default_clip_duration_ms() -> u64 {
    2000
}

impl PanelConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        syneval_common::config::load_toml(path).map_err(|e| Error::Config(e.to_string()))
    }

    /// Inter-clip pause as a Duration
    pub fn inter_clip_delay(&self) -> Duration {
        Duration::from_millis(self.inter_clip_delay_ms)
    }

    /// Simulated clip length as a Duration
    pub fn clip_duration(&self) -> Duration {
        Duration::from_millis(self.clip_duration_ms)
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            tasks_path: PathBuf::from("tasks.json"),
            inter_clip_delay_ms: default_inter_clip_delay_ms(),
            event_capacity: default_event_capacity(),
            clip_duration_ms: default_clip_duration_ms(),
            logging: LoggingConfig::default(),
        }
    }
}
