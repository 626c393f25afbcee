//! # sensor-replay: Sensor CSV to MQTT replayer
//!
//! Reads recorded sensor rows from a CSV file, shows a diagnostic plot,
//! prints min/max summaries, then publishes every row as one MQTT message
//! at a fixed interval before disconnecting.
//!
//! ## Architecture
//!
//! - **Dataset**: CSV loading with per-column type inference
//! - **Session**: Message encoding and the paced replay publisher
//! - **Backend**: Channel trait with MQTT (rumqttc) and in-memory backends
//! - **Frontend**: Diagnostic plot window using eframe/egui with egui_plot
//!
//! ## Message Format
//!
//! Each row becomes `key=value` pairs joined by commas, in column order:
//!
//! ```text
//! timestamp=2024-05-01 10:00:00,dht_temp=21.5,dht_hum=60,soil=300,ds18_1=19.2
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use sensor_replay::{
//!     backend::open_channel,
//!     config::AppConfig,
//!     dataset::Dataset,
//!     session::ReplayPublisher,
//! };
//!
//! fn main() -> sensor_replay::Result<()> {
//!     let mut config = AppConfig::default();
//!     config.input = Some("data.csv".into());
//!
//!     let dataset = Dataset::load("data.csv")?;
//!     let channel = open_channel(&config, false)?;
//!     let report = ReplayPublisher::new(channel, config.replay.clone()).run(dataset.records())?;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod dataset;
pub mod error;
pub mod frontend;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use backend::{Channel, MemoryChannel, MqttChannel};
pub use config::{AppConfig, BrokerConfig, ReplaySettings};
pub use dataset::Dataset;
pub use error::{ReplayError, Result};
pub use session::{Message, ReplayPublisher, ReplayReport};
pub use types::{Field, Record, Value};
