//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub poller: PollerSettings,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dashboard server connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Live metrics poller configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollerSettings {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_secs: u64,

    #[serde(default = "default_max_failures")]
    pub max_consecutive_failures: u32,

    #[serde(default = "default_history_points")]
    pub history_points: usize,
}

fn default_poll_interval() -> u64 {
    10
}

fn default_reconnect_delay() -> u64 {
    5
}

fn default_max_failures() -> u32 {
    3
}

fn default_history_points() -> usize {
    30
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            reconnect_delay_secs: default_reconnect_delay(),
            max_consecutive_failures: default_max_failures(),
            history_points: default_history_points(),
        }
    }
}

/// Terminal UI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    #[serde(default = "default_particle_count")]
    pub particle_count: usize,
}

fn default_tick_rate() -> u64 {
    200
}

fn default_particle_count() -> usize {
    50
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            particle_count: default_particle_count(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("vitascope").join("config.toml")),
            Some(PathBuf::from("/etc/vitascope/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("VITASCOPE_SERVER_URL") {
            self.server.base_url = url;
        }
        if let Ok(interval) = std::env::var("VITASCOPE_POLL_INTERVAL") {
            if let Ok(secs) = interval.parse() {
                self.poller.poll_interval_secs = secs;
            }
        }
        if let Ok(level) = std::env::var("VITASCOPE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(file) = std::env::var("VITASCOPE_LOG_FILE") {
            self.logging.file = Some(file);
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# VitaScope Client Configuration
#
# Environment variables override these settings:
# - VITASCOPE_SERVER_URL
# - VITASCOPE_POLL_INTERVAL
# - VITASCOPE_LOG_LEVEL
# - VITASCOPE_LOG_FILE

[server]
# Dashboard server base URL
base_url = "http://localhost:5000"

# Request timeout in milliseconds
request_timeout_ms = 5000

[poller]
# How often to fetch live readings (seconds)
poll_interval_secs = 10

# Spacing between reconnection attempts (seconds)
reconnect_delay_secs = 5

# Consecutive fetch failures tolerated before giving up
max_consecutive_failures = 3

# Chart history length (points)
history_points = 30

[ui]
# UI redraw tick (milliseconds)
tick_rate_ms = 200

# Background particle count
particle_count = 50

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Optional log file path; without one, logs are silenced while the
# dashboard owns the terminal
# file = "/tmp/vitascope.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://localhost:5000");
        assert_eq!(config.poller.poll_interval_secs, 10);
        assert_eq!(config.poller.max_consecutive_failures, 3);
        assert_eq!(config.poller.history_points, 30);
        assert_eq!(config.ui.particle_count, 50);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nbase_url = \"http://example.test:8080\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.base_url, "http://example.test:8080");
        assert_eq!(config.server.request_timeout_ms, 5000);
        assert_eq!(config.poller.reconnect_delay_secs, 5);
    }

    #[test]
    fn test_generated_default_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.poller.history_points, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server = not valid").unwrap();

        match Config::load(file.path()) {
            Err(ConfigError::Parse { .. }) => {}
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
