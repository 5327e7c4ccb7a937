//! Garden configuration
//!
//! Loaded in this order of precedence (highest wins):
//! 1. Environment variables (`HAIKU_IMAGE_BASE_PATH`, `HAIKU_TOOL_NAME`,
//!    `HAIKU_LOG_LEVEL`)
//! 2. YAML file passed to [`GardenConfig::load`]
//! 3. Built-in defaults

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default URL prefix of the illustration assets
pub const DEFAULT_IMAGE_BASE_PATH: &str = "/haiku-images";
/// Default name of the proposal tool, as the agent sees it
pub const DEFAULT_TOOL_NAME: &str = "generateHaiku";

/// Configuration for a garden session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    /// Prefix joined with catalog ids to build image paths
    pub image_base_path: String,
    /// Tool name registered with the agent layer
    pub tool_name: String,
    /// Buffer size of the session event channel
    pub event_capacity: usize,
    /// Logging setup
    pub logging: LogConfig,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            image_base_path: DEFAULT_IMAGE_BASE_PATH.to_string(),
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            event_capacity: 256,
            logging: LogConfig::default(),
        }
    }
}

/// Where and how verbosely to log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Directory for rotated log files
    pub directory: String,
    /// Log file prefix (e.g. "haiku-garden.log")
    pub filename_prefix: String,
    /// Default level filter, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            filename_prefix: "haiku-garden.log".to_string(),
            level: "info".to_string(),
        }
    }
}

impl GardenConfig {
    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: GardenConfig = serde_yaml_ng::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// Defaults, then the optional file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `HAIKU_*` overrides from a lookup function
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("HAIKU_IMAGE_BASE_PATH") {
            self.image_base_path = v;
        }
        if let Some(v) = lookup("HAIKU_TOOL_NAME") {
            self.tool_name = v;
        }
        if let Some(v) = lookup("HAIKU_LOG_LEVEL") {
            self.logging.level = v;
        }
    }

    /// Reject values the session cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.image_base_path.trim().is_empty() {
            return Err(Error::config("image_base_path must not be empty"));
        }
        if self.tool_name.trim().is_empty() {
            return Err(Error::config("tool_name must not be empty"));
        }
        if self.event_capacity == 0 {
            return Err(Error::config("event_capacity must be at least 1"));
        }
        Ok(())
    }
}
