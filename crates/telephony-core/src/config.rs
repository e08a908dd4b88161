//! Runtime configuration
//!
//! Configuration is a small TOML document:
//!
//! ```toml
//! snapshot = "/etc/telephony/daemon.json"
//!
//! [features]
//! "http://tizen.org/feature/network.telephony" = true
//!
//! [logging]
//! level = "debug"
//! json = false
//! file_info = false
//! ```
//!
//! The library never installs a subscriber itself; `[logging]` is read by
//! binaries such as `telephony-probe`.
//!
//! Every section is optional; [`TelephonyConfig::default`] enables the
//! telephony feature and logs at `info`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::feature::TELEPHONY_FEATURE;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "TELEPHONY_CONFIG";

/// Errors raised while loading configuration or daemon snapshots
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {message}")]
    Parse { message: String },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Logging section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    /// Include source file and line in each record
    pub file_info: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_info: false,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelephonyConfig {
    /// Platform feature flags answered by [`crate::feature::StaticFeatures`]
    pub features: BTreeMap<String, bool>,
    /// JSON daemon snapshot served by the in-process daemon
    pub snapshot: Option<PathBuf>,
    pub logging: LogSettings,
}

impl Default for TelephonyConfig {
    fn default() -> Self {
        let mut features = BTreeMap::new();
        features.insert(TELEPHONY_FEATURE.to_string(), true);
        Self {
            features,
            snapshot: None,
            logging: LogSettings::default(),
        }
    }
}

impl TelephonyConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let mut config = Self::from_toml_str(&text)?;

        // Relative snapshot paths are relative to the config file.
        if let (Some(snapshot), Some(dir)) = (config.snapshot.as_ref(), path.parent()) {
            if snapshot.is_relative() {
                config.snapshot = Some(dir.join(snapshot));
            }
        }
        Ok(config)
    }

    /// Load from the file named by `TELEPHONY_CONFIG`, or the defaults when
    /// the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn with_feature(mut self, key: impl Into<String>, enabled: bool) -> Self {
        self.features.insert(key.into(), enabled);
        self
    }

    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(path.into());
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        crate::logging::parse_log_level(&self.logging.level)
            .map_err(|_| ConfigError::invalid(format!("unknown log level '{}'", self.logging.level)))?;
        Ok(())
    }
}
