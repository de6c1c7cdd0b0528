//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::ChangeDetection;
use crate::client::ClientConfig;
use crate::poller::PollerConfig;
use crate::render::{ViewOptions, DEFAULT_SEARCH_PREFIX_LEN};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub view: ViewConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Gossiper GUI server connection
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:13081".to_string()
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

/// Poller scheduling
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval")]
    pub interval_ms: u64,

    #[serde(default)]
    pub change_detection: ChangeDetection,
}

fn default_poll_interval() -> u64 {
    1000 // 1 second
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval(),
            change_detection: ChangeDetection::default(),
        }
    }
}

/// View presentation
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    /// Characters stripped from the front of each search match
    #[serde(default = "default_search_prefix_len")]
    pub search_prefix_len: usize,
}

fn default_search_prefix_len() -> usize {
    DEFAULT_SEARCH_PREFIX_LEN
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            search_prefix_len: default_search_prefix_len(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl From<&ServerConfig> for ClientConfig {
    fn from(server: &ServerConfig) -> Self {
        ClientConfig {
            base_url: server.base_url.clone(),
            request_timeout_ms: server.request_timeout_ms,
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

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
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
            dirs::config_dir().map(|p| p.join("peerster-gui").join("config.toml")),
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

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PEERSTER_GUI_URL") {
            self.server.base_url = url;
        }

        if let Ok(interval) = std::env::var("PEERSTER_GUI_POLL_MS") {
            if let Ok(ms) = interval.parse() {
                self.polling.interval_ms = ms;
            }
        }

        if let Ok(level) = std::env::var("PEERSTER_GUI_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PEERSTER_GUI_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Settings shared by all pollers
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_millis(self.polling.interval_ms),
            change_detection: self.polling.change_detection,
            view: self.view_options(),
        }
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            search_prefix_len: self.view.search_prefix_len,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::from(&self.server)
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
    r#"# Peerster GUI Configuration
#
# Environment variables override these settings:
# - PEERSTER_GUI_URL
# - PEERSTER_GUI_POLL_MS
# - PEERSTER_GUI_LOG_LEVEL
# - PEERSTER_GUI_LOG_FORMAT

[server]
# Gossiper GUI server
base_url = "http://127.0.0.1:13081"

# Request timeout in milliseconds
request_timeout_ms = 5000

[polling]
# How often each resource is fetched (ms)
interval_ms = 1000

# growth: re-render only when a collection gets longer
# content: re-render whenever a collection differs
change_detection = "growth"

[view]
# Characters stripped from search matches ("_SharedFiles/")
search_prefix_len = 13

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}
