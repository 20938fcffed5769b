use groupclick_types::economy::CLICK_INTERVAL_MS;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use thiserror::Error;
use tracing::Level;

use crate::Settings;

/// Server configuration, usually read from a YAML file. Every field has a
/// default so an empty file (or no file) is valid.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Artificial delay before each command is applied.
    #[serde(default)]
    pub latency_ms: u64,
    /// Minimum spacing of clicks per session. 0 disables the limit.
    #[serde(default = "default_click_interval_ms")]
    pub click_interval_ms: u64,
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,

    #[serde(default)]
    pub snapshot: Option<String>,
    /// 0 saves only at shutdown.
    #[serde(default = "default_snapshot_interval_secs")]
    pub snapshot_interval_secs: u64,

    #[serde(default = "default_http_replenish_ms")]
    pub http_replenish_ms: u64,
    #[serde(default = "default_http_burst")]
    pub http_burst: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
}

#[derive(Clone, Debug)]
pub struct ValidatedConfig {
    pub port: u16,
    pub log_level: Level,

    pub latency: Duration,
    pub click_interval: Option<Duration>,
    pub broadcast_capacity: usize,

    pub snapshot: Option<PathBuf>,
    pub snapshot_interval: Option<Duration>,

    pub http_replenish: Duration,
    pub http_burst: u32,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_click_interval_ms() -> u64 {
    CLICK_INTERVAL_MS
}

fn default_broadcast_capacity() -> usize {
    1024
}

fn default_snapshot_interval_secs() -> u64 {
    30
}

fn default_http_replenish_ms() -> u64 {
    10
}

fn default_http_burst() -> u32 {
    200
}

fn non_zero_duration(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_millis(value))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_level: default_log_level(),
            latency_ms: 0,
            click_interval_ms: default_click_interval_ms(),
            broadcast_capacity: default_broadcast_capacity(),
            snapshot: None,
            snapshot_interval_secs: default_snapshot_interval_secs(),
            http_replenish_ms: default_http_replenish_ms(),
            http_burst: default_http_burst(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as a map
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.broadcast_capacity == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "broadcast_capacity",
                value: 0,
            });
        }
        if self.http_replenish_ms == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "http_replenish_ms",
                value: 0,
            });
        }
        if self.http_burst == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "http_burst",
                value: 0,
            });
        }

        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;

        Ok(ValidatedConfig {
            port: self.port,
            log_level,
            latency: Duration::from_millis(self.latency_ms),
            click_interval: non_zero_duration(self.click_interval_ms),
            broadcast_capacity: self.broadcast_capacity,
            snapshot: self.snapshot.map(PathBuf::from),
            snapshot_interval: (self.snapshot_interval_secs > 0)
                .then(|| Duration::from_secs(self.snapshot_interval_secs)),
            http_replenish: Duration::from_millis(self.http_replenish_ms),
            http_burst: self.http_burst,
        })
    }
}

impl ValidatedConfig {
    pub fn settings(&self) -> Settings {
        Settings {
            latency: self.latency,
            click_interval: self.click_interval,
            broadcast_capacity: self.broadcast_capacity,
            http_replenish: self.http_replenish,
            http_burst: self.http_burst,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap().validate().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.latency, Duration::ZERO);
        assert_eq!(config.click_interval, Some(Duration::from_millis(200)));
        assert_eq!(config.snapshot, None);
        assert_eq!(config.snapshot_interval, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_partial_config() {
        let yaml = "port: 9000\nlatency_ms: 100\nclick_interval_ms: 0\nsnapshot: /tmp/economy.bin\nsnapshot_interval_secs: 0\nlog_level: debug\n";
        let config = Config::parse(yaml).unwrap().validate().unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.latency, Duration::from_millis(100));
        assert_eq!(config.click_interval, None);
        assert_eq!(config.snapshot, Some(PathBuf::from("/tmp/economy.bin")));
        assert_eq!(config.snapshot_interval, None);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = Config {
            log_level: "loud".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLogLevel { .. })
        ));

        let config = Config {
            broadcast_capacity: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNonZero {
                field: "broadcast_capacity",
                ..
            })
        ));

        assert!(Config::parse("port: [1, 2]").is_err());
    }
}
