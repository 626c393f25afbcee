//! Command-line arguments and their merge onto the file config

use super::AppConfig;
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Replay a sensor CSV file to an MQTT broker, one row per interval
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "sensor-replay", version, about)]
pub struct CliArgs {
    /// CSV file with a `timestamp` column
    #[arg(env = "SENSOR_REPLAY_INPUT")]
    pub input: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long, env = "SENSOR_REPLAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Broker hostname
    #[arg(long, env = "SENSOR_REPLAY_HOST")]
    pub host: Option<String>,

    /// Broker port
    #[arg(short, long, env = "SENSOR_REPLAY_PORT")]
    pub port: Option<u16>,

    /// Topic to publish on
    #[arg(short, long, env = "SENSOR_REPLAY_TOPIC")]
    pub topic: Option<String>,

    /// Delay between rows in milliseconds
    #[arg(short, long, env = "SENSOR_REPLAY_INTERVAL_MS")]
    pub interval_ms: Option<u64>,

    /// MQTT client identifier
    #[arg(long, env = "SENSOR_REPLAY_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Skip the diagnostic plot window
    #[arg(long)]
    pub no_plot: bool,

    /// Log messages instead of connecting to a broker
    #[arg(long)]
    pub dry_run: bool,

    /// Also write logs to this file
    #[arg(long, env = "SENSOR_REPLAY_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl CliArgs {
    /// Resolve the effective config: defaults < config file < flags.
    ///
    /// An explicit `--config` must exist; the default location is optional.
    pub fn resolve(&self) -> Result<AppConfig> {
        let base = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::load_default_location()?,
        };
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }

    /// Overlay the flags that were given onto `config`
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(input) = &self.input {
            config.input = Some(input.clone());
        }
        if let Some(host) = &self.host {
            config.broker.host = host.clone();
        }
        if let Some(port) = self.port {
            config.broker.port = port;
        }
        if let Some(client_id) = &self.client_id {
            config.broker.client_id = client_id.clone();
        }
        if let Some(topic) = &self.topic {
            config.replay.topic = topic.clone();
        }
        if let Some(interval_ms) = self.interval_ms {
            config.replay.interval_ms = interval_ms;
        }
        if self.no_plot {
            config.report.plot = false;
        }
        config
    }
}
