//! Configuration file handling for stitch-chart.
//!
//! Loads configuration from `<config dir>/stitch-chart/config.toml` or a
//! custom path given with `--config`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::normalize::{
    validate_resolution, validate_threshold, NormalizeSettings, DEFAULT_BACKGROUND,
    DEFAULT_PROGRAM, DEFAULT_RESOLUTION, DEFAULT_THRESHOLD,
};

/// Configuration file structure.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[normalize]` section. Unset values fall back to the built-in defaults.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NormalizeConfig {
    pub program: Option<String>,
    pub resolution: Option<u32>,
    pub threshold: Option<u8>,
    pub background: Option<String>,
}

/// `[output]` section.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Print the chart to stdout
    #[serde(default = "default_true")]
    pub grid: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { grid: true }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist. Without one, the default
    /// location is tried and a missing file yields the default config.
    /// A file that exists but cannot be parsed is always an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::load_file(path)
            }
            None => {
                let path = default_path();
                if path.exists() {
                    Self::load_file(&path)
                } else {
                    log::debug!("No config file at {}, using defaults", path.display());
                    Ok(Config::default())
                }
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::parse(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check value ranges that TOML types alone do not enforce.
    ///
    /// Uses the same bounds as the command-line parsers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(resolution) = self.normalize.resolution {
            validate_resolution(resolution).map_err(|reason| ConfigError::Invalid {
                key: "normalize.resolution",
                value: resolution.to_string(),
                reason,
            })?;
        }
        if let Some(threshold) = self.normalize.threshold {
            validate_threshold(threshold).map_err(|reason| ConfigError::Invalid {
                key: "normalize.threshold",
                value: threshold.to_string(),
                reason,
            })?;
        }
        Ok(())
    }

    /// Normalizer settings from this config, with built-in defaults for
    /// anything unset.
    pub fn normalize_settings(&self) -> NormalizeSettings {
        let n = &self.normalize;
        NormalizeSettings {
            program: n.program.clone().unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
            resolution: n.resolution.unwrap_or(DEFAULT_RESOLUTION),
            threshold: n.threshold.unwrap_or(DEFAULT_THRESHOLD),
            background: n
                .background
                .clone()
                .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    NotFound(PathBuf),
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(path) => {
                write!(f, "Config file '{}' not found", path.display())
            }
            ConfigError::IoError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::Invalid { key, value, reason } => {
                write!(f, "Invalid config value {} = {}: {}", key, value, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::NotFound(_) | ConfigError::Invalid { .. } => None,
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("stitch-chart").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/stitch-chart/config.toml")
        })
}

/// Contents written by `stitch-chart --init-config`.
pub const DEFAULT_CONFIG: &str = r#"# stitch-chart configuration

[normalize]
# ImageMagick executable used to prepare the image
program = "convert"
# Square bound of the chart in cells
resolution = 40
# Binarization threshold in percent
threshold = 97
# Color replacing transparent areas
background = "white"

[output]
# Print the chart to the terminal
grid = true
"#;
