//! Configuration for the generator and the CLI.
//!
//! The library itself needs no configuration; these settings choose the
//! entropy device and drive the `randstream` binary.

use crate::source::DEFAULT_DEVICE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Generator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Device read for the initial seed.
    pub entropy_device: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            entropy_device: PathBuf::from(DEFAULT_DEVICE),
        }
    }
}

/// Output settings for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Number of identifiers to print when not continuous.
    pub count: u32,
    /// Bytes per identifier.
    pub length: usize,
    /// Print until interrupted instead of stopping after `count`.
    pub continuous: bool,
    /// Delay between identifiers in continuous mode.
    pub interval_ms: u64,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            count: 1,
            length: 20,
            continuous: false,
            interval_ms: 1000,
            metrics_port: 0,
        }
    }
}

impl OutputConfig {
    /// Validates the output parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.length == 0 || self.length > MAX_LENGTH {
            return Err(ConfigError::InvalidLength(self.length));
        }
        if self.continuous && self.interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        Ok(())
    }
}

/// Largest identifier the CLI will print, in bytes.
pub const MAX_LENGTH: usize = 1024 * 1024;

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Identifier length outside `1..=MAX_LENGTH`.
    #[error("invalid identifier length {0} (must be 1-{max} bytes)", max = MAX_LENGTH)]
    InvalidLength(usize),
    /// Continuous mode with a zero interval.
    #[error("continuous mode needs a non-zero interval")]
    InvalidInterval,
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[generator]` section.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// `[output]` section.
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.output.validate()?;
        Ok(config)
    }
}
