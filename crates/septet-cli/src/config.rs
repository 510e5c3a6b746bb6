//! CLI configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::present::OutputFormat;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying parse error
        source: toml::de::Error,
    },

    /// A value is out of its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Input ingestion settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Initial buffer capacity in values; doubled as needed
    pub initial_capacity: usize,
    /// Maximum number of values accepted, unlimited if unset
    pub max_values: Option<usize>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_values: None,
        }
    }
}

/// Output rendering settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Number format
    pub format: OutputFormat,
    /// Separator placed between values
    pub separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Decimal,
            separator: ",".to_string(),
        }
    }
}

/// Decoder settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Accept run tokens of length 0 or 1
    pub lenient: bool,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when neither `--verbose`, `--debug` nor `RUST_LOG` is set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Full CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input settings
    pub input: InputConfig,
    /// Output settings
    pub output: OutputConfig,
    /// Decoder settings
    pub decode: DecodeConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl Config {
    /// Default config location (`$CONFIG_DIR/septet/config.toml`)
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("septet")
            .join("config.toml")
    }

    /// Expand a leading `~/` to the home directory
    pub fn expand_path(raw: &str) -> PathBuf {
        match raw.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(rest),
            None => PathBuf::from(raw),
        }
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load an explicit path, or the default path if it exists, or defaults
    pub fn resolve(explicit: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(raw) = explicit {
            return Self::load(&Self::expand_path(raw));
        }

        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.initial_capacity == 0 {
            return Err(ConfigError::Invalid(
                "input.initial_capacity must be greater than 0".to_string(),
            ));
        }
        if self.input.max_values == Some(0) {
            return Err(ConfigError::Invalid(
                "input.max_values must be greater than 0 when set".to_string(),
            ));
        }
        if self.output.separator.is_empty() {
            return Err(ConfigError::Invalid(
                "output.separator must not be empty".to_string(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }
        Ok(())
    }
}
