use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config directory")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Log levels accepted in `[logging] level`.
const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Longest method-call timeout accepted, in seconds.
const MAX_METHOD_TIMEOUT_SECS: u64 = 3600;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bus: BusConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How to reach ConsoleKit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusConfig {
    /// D-Bus address to use instead of the system bus
    /// (e.g. `unix:path=/run/dbus/system_bus_socket`).
    #[serde(default)]
    pub address: Option<String>,

    /// Per-call timeout in seconds. 0 keeps the transport default.
    #[serde(default)]
    pub method_timeout_secs: u64,
}

impl BusConfig {
    pub fn method_timeout(&self) -> Option<Duration> {
        (self.method_timeout_secs > 0).then(|| Duration::from_secs(self.method_timeout_secs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("org", "freedesktop", "ck-tools")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location.
    ///
    /// A missing file yields the defaults. Nothing is written back.
    pub fn load() -> Result<Self, ConfigError> {
        let path = match Self::config_path() {
            Ok(path) => path,
            Err(ConfigError::NoConfigDir) => return Ok(Config::default()),
            Err(e) => return Err(e),
        };

        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Load config from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }

        if let Some(address) = &self.bus.address {
            if address.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "bus.address cannot be empty".into(),
                ));
            }
            if !address.contains(':') {
                return Err(ConfigError::ValidationError(format!(
                    "bus.address '{}' is not a D-Bus address (expected transport:key=value)",
                    address
                )));
            }
        }

        if self.bus.method_timeout_secs > MAX_METHOD_TIMEOUT_SECS {
            return Err(ConfigError::ValidationError(format!(
                "bus.method_timeout_secs cannot exceed {} seconds",
                MAX_METHOD_TIMEOUT_SECS
            )));
        }

        Ok(())
    }
}
