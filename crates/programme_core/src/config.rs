//! Service configuration.
//!
//! ```toml
//! api_prefix = "/api/v1"
//! hydration = "lazy"
//! interval_policy = "inherit_slot"
//!
//! [logging]
//! level = "info"
//! dir = "/var/log/programme"
//! ```

use crate::conflict::IntervalPolicy;
use crate::logging::{default_log_level, normalize_level};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Whether selecting a day may trigger a fetch of its time slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HydrationMode {
    /// Selection never fetches; the programme is loaded up front.
    #[default]
    Eager,
    /// Selecting a cached day without time slots fetches them.
    Lazy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files; `None` leaves logging off.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgrammeConfig {
    /// Path prefix of every remote resource, e.g. `/api/v1`.
    pub api_prefix: String,
    pub hydration: HydrationMode,
    pub interval_policy: IntervalPolicy,
    pub logging: LoggingConfig,
}

impl Default for ProgrammeConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api/v1".to_string(),
            hydration: HydrationMode::default(),
            interval_policy: IntervalPolicy::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ProgrammeConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ProgrammeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_prefix.starts_with('/') || self.api_prefix.ends_with('/') {
            return Err(ConfigError::Invalid(format!(
                "api_prefix must start with `/` and must not end with `/`, got `{}`",
                self.api_prefix
            )));
        }
        normalize_level(&self.logging.level)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be absolute, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}
