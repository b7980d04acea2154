//! Configuration
//!
//! Loaded from an optional TOML file, then overridden by `BIKE_DASHBOARD_*`
//! environment variables. Every field has a default so an empty (or absent)
//! file is a valid configuration.

use crate::pager::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset locations and table paging
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_daily_csv")]
    pub daily_csv: PathBuf,

    #[serde(default = "default_hourly_csv")]
    pub hourly_csv: PathBuf,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_daily_csv() -> PathBuf {
    PathBuf::from("data/day.csv")
}

fn default_hourly_csv() -> PathBuf {
    PathBuf::from("data/hour.csv")
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            daily_csv: default_daily_csv(),
            hourly_csv: default_hourly_csv(),
            page_size: default_page_size(),
        }
    }
}

/// HTTP server configuration (server feature only)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration: explicit file, else `./dashboard.toml` if it
    /// exists, else defaults. Environment overrides are applied last.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Self::load(local)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `BIKE_DASHBOARD_*` overrides from any key lookup
    /// (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("BIKE_DASHBOARD_DAILY_CSV") {
            self.data.daily_csv = PathBuf::from(path);
        }
        if let Some(path) = lookup("BIKE_DASHBOARD_HOURLY_CSV") {
            self.data.hourly_csv = PathBuf::from(path);
        }
        if let Some(size) = lookup("BIKE_DASHBOARD_PAGE_SIZE") {
            self.data.page_size = parse_value("BIKE_DASHBOARD_PAGE_SIZE", &size)?;
        }
        if let Some(host) = lookup("BIKE_DASHBOARD_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("BIKE_DASHBOARD_PORT") {
            self.server.port = parse_value("BIKE_DASHBOARD_PORT", &port)?;
        }
        if let Some(level) = lookup("BIKE_DASHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "data.page_size".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Command-line overrides shared by both binaries; applied after the
/// config file and environment.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Path to a TOML config file (default: ./dashboard.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Daily records CSV
    #[arg(long, global = true)]
    pub daily: Option<PathBuf>,

    /// Hourly records CSV
    #[arg(long, global = true)]
    pub hourly: Option<PathBuf>,

    /// Rows per table page
    #[arg(long, global = true)]
    pub page_size: Option<usize>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        let mut config = Config::resolve(self.config.as_deref())?;

        if let Some(path) = &self.daily {
            config.data.daily_csv = path.clone();
        }
        if let Some(path) = &self.hourly {
            config.data.hourly_csv = path.clone();
        }
        if let Some(size) = self.page_size {
            config.data.page_size = size;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
