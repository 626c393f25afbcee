//! Configuration module for sensor-replay
//!
//! This module handles run configuration including:
//! - Broker connection settings (host, port, client id, keep-alive)
//! - Replay settings (topic, pacing interval)
//! - Report settings (diagnostic plot series, summary fields)
//!
//! # Sources
//!
//! Settings are layered, later sources win:
//! 1. Built-in defaults
//! 2. A TOML config file (`--config`, or `config.toml` in the app config directory)
//! 3. Command-line flags / `SENSOR_REPLAY_*` environment variables
//!
//! # Config Location
//!
//! - **Linux**: `~/.config/sensor-replay/config.toml`
//! - **macOS**: `~/Library/Application Support/sensor-replay/config.toml`
//! - **Windows**: `%APPDATA%\sensor-replay\config.toml`
//!
//! # Example
//!
//! ```toml
//! input = "data.csv"
//!
//! [broker]
//! host = "localhost"
//! port = 1883
//!
//! [replay]
//! topic = "ue5/test"
//! interval_ms = 1000
//!
//! [[report.series]]
//! field = "dht_temp"
//! label = "Air Temp (DHT11)"
//! ```

pub mod cli;

pub use cli::CliArgs;

use crate::error::{ReplayError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier for config directories
pub const APP_ID: &str = "sensor-replay";

/// Config filename inside the app config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Default broker host
pub const DEFAULT_HOST: &str = "localhost";

/// Default MQTT port
pub const DEFAULT_PORT: u16 = 1883;

/// Default topic messages are published on
pub const DEFAULT_TOPIC: &str = "ue5/test";

/// Default delay between two published rows
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Default MQTT keep-alive in seconds
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 60;

/// Default time to wait for the broker's CONNACK
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default MQTT client identifier
pub const DEFAULT_CLIENT_ID: &str = "sensor-replay";

// ==================== Config Directory ====================

/// Get the application config directory path
pub fn app_config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the default config file
pub fn default_config_path() -> Option<PathBuf> {
    app_config_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Broker ====================

/// Connection settings for the MQTT broker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Broker hostname or IP address
    pub host: String,
    /// Broker TCP port
    pub port: u16,
    /// MQTT client identifier
    pub client_id: String,
    /// Keep-alive interval in seconds
    pub keep_alive_secs: u64,
    /// How long to wait for the broker to accept the connection
    pub connect_timeout_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            keep_alive_secs: DEFAULT_KEEP_ALIVE_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl BrokerConfig {
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// `host:port` for log lines
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ==================== Replay ====================

/// Settings consumed by the replay publisher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaySettings {
    /// Topic every message is published on
    pub topic: String,
    /// Delay between two consecutive rows in milliseconds
    pub interval_ms: u64,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl ReplaySettings {
    pub fn new(topic: impl Into<String>, interval: Duration) -> Self {
        Self {
            topic: topic.into(),
            interval_ms: interval.as_millis() as u64,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

// ==================== Report ====================

/// One line on the diagnostic plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Column to plot
    pub field: String,
    /// Legend label (defaults to the field name)
    #[serde(default)]
    pub label: Option<String>,
}

impl SeriesConfig {
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: Some(label.into()),
        }
    }

    /// Label shown in the legend
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.field)
    }
}

/// Diagnostic output shown before the replay starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Show the plot window
    #[serde(default = "default_true")]
    pub plot: bool,

    /// Lines drawn on the plot
    #[serde(default = "default_series")]
    pub series: Vec<SeriesConfig>,

    /// Fields to print min/max for (`None` = every orderable column)
    #[serde(default)]
    pub summary_fields: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}

fn default_series() -> Vec<SeriesConfig> {
    vec![
        SeriesConfig::new("dht_temp", "Air Temp (DHT11)"),
        SeriesConfig::new("ds18_1", "Concrete Temp 1"),
        SeriesConfig::new("dht_hum", "Air Humidity (%)"),
    ]
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            plot: true,
            series: default_series(),
            summary_fields: None,
        }
    }
}

// ==================== App Config ====================

/// Complete configuration for one run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// CSV file to replay
    #[serde(default)]
    pub input: Option<PathBuf>,

    #[serde(default)]
    pub broker: BrokerConfig,

    #[serde(default)]
    pub replay: ReplaySettings,

    #[serde(default)]
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReplayError::Config(format!("Failed to read config: {}", e)))
            .with_context(|| path.display().to_string())?;

        Self::from_toml_str(&content).with_context(|| path.display().to_string())
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ReplayError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load the config file from the app config directory, defaults if absent
    pub fn load_default_location() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Using config file {:?}", path);
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Save config to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ReplayError::Serialization(e.to_string()))
            .context("Failed to serialize config")?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| ReplayError::Config(format!("Failed to write config: {}", e)))
    }

    /// Reject settings the broker client or publisher cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.broker.host.trim().is_empty() {
            return Err(ReplayError::Config("broker host must not be empty".to_string()));
        }
        if self.broker.port == 0 {
            return Err(ReplayError::Config("broker port must not be 0".to_string()));
        }
        if self.broker.client_id.is_empty() {
            return Err(ReplayError::Config("client id must not be empty".to_string()));
        }
        if self.broker.keep_alive_secs < 1 {
            return Err(ReplayError::Config(
                "keep-alive must be at least 1 second".to_string(),
            ));
        }
        if self.broker.connect_timeout_secs == 0 {
            return Err(ReplayError::Config(
                "connect timeout must be at least 1 second".to_string(),
            ));
        }
        if self.replay.topic.is_empty() {
            return Err(ReplayError::Config("topic must not be empty".to_string()));
        }
        if self.replay.topic.contains(['+', '#']) {
            return Err(ReplayError::Config(format!(
                "topic '{}' must not contain wildcards",
                self.replay.topic
            )));
        }
        self.input_path()?;
        Ok(())
    }

    /// The CSV file to replay
    pub fn input_path(&self) -> Result<&Path> {
        self.input
            .as_deref()
            .ok_or_else(|| ReplayError::Config("no input file given".to_string()))
    }
}
