//! Backend module for publish/subscribe channels
//!
//! This module owns everything that talks to the outside world once the
//! replay starts.
//!
//! # Components
//!
//! - [`Channel`] - Trait implemented by every backend
//! - [`MqttChannel`] - Real broker connection via rumqttc
//! - [`MemoryChannel`] - In-process channel for `--dry-run` and tests
//! - [`ChannelStats`] - Publish counters kept by each backend
//!
//! # Example
//!
//! ```ignore
//! use sensor_replay::backend::open_channel;
//! use sensor_replay::config::AppConfig;
//!
//! let config = AppConfig::default();
//! let mut channel = open_channel(&config, false)?;
//! channel.publish("ue5/test", b"timestamp=2024-01-01 00:00:00,soil=300")?;
//! channel.close()?;
//! ```

pub mod channel_trait;
pub mod memory_channel;
pub mod mqtt_channel;

pub use channel_trait::{Channel, ChannelStats};
pub use memory_channel::{ChannelEvent, MemoryChannel};
pub use mqtt_channel::MqttChannel;

use crate::config::AppConfig;
use crate::error::Result;

/// Open the channel a run publishes on.
///
/// `dry_run` swaps the broker for a detached [`MemoryChannel`].
pub fn open_channel(config: &AppConfig, dry_run: bool) -> Result<Box<dyn Channel>> {
    if dry_run {
        tracing::info!("Dry run: messages for {} are not sent", config.broker.address());
        return Ok(Box::new(MemoryChannel::detached()));
    }
    Ok(Box::new(MqttChannel::connect(&config.broker)?))
}
