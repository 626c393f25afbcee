//! Channel trait for unified publish interface
//!
//! This module provides a common trait for all publish/subscribe channel
//! implementations, enabling both a real MQTT broker connection and an
//! in-memory channel for dry runs and tests.

use crate::error::Result;

/// Statistics for publish operations
///
/// Tracks counts, payload volume and the time spent handing messages to the
/// client library.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStats {
    /// Total number of accepted publishes
    pub messages_sent: u64,
    /// Total number of rejected publishes
    pub failed_publishes: u64,
    /// Total payload bytes accepted
    pub bytes_sent: u64,
    /// Total publish time in microseconds
    pub total_publish_time_us: u64,
    /// Minimum publish time observed (microseconds)
    pub min_publish_time_us: u64,
    /// Maximum publish time observed (microseconds)
    pub max_publish_time_us: u64,
}

impl Default for ChannelStats {
    fn default() -> Self {
        Self {
            messages_sent: 0,
            failed_publishes: 0,
            bytes_sent: 0,
            total_publish_time_us: 0,
            min_publish_time_us: u64::MAX,
            max_publish_time_us: 0,
        }
    }
}

impl ChannelStats {
    /// Record an accepted publish
    pub fn record_success(&mut self, time_us: u64, bytes: u64) {
        self.messages_sent += 1;
        self.bytes_sent += bytes;
        self.total_publish_time_us += time_us;
        self.min_publish_time_us = self.min_publish_time_us.min(time_us);
        self.max_publish_time_us = self.max_publish_time_us.max(time_us);
    }

    /// Record a rejected publish
    pub fn record_failure(&mut self) {
        self.failed_publishes += 1;
    }

    /// Calculate average publish time in microseconds
    pub fn avg_publish_time_us(&self) -> f64 {
        if self.messages_sent == 0 {
            0.0
        } else {
            self.total_publish_time_us as f64 / self.messages_sent as f64
        }
    }
}

/// Unified interface for publish/subscribe channels
///
/// A channel is opened by its constructor, receives every publish of one
/// replay, and is closed once afterwards. Implementations must be `Send`.
///
/// # Example
///
/// ```ignore
/// fn publish_all(channel: &mut dyn Channel, topic: &str, payloads: &[Vec<u8>]) -> Result<()> {
///     for payload in payloads {
///         channel.publish(topic, payload)?;
///     }
///     channel.close()
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait Channel: Send {
    /// Publish one payload on `topic`
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<()>;

    /// Tear down the connection
    fn close(&mut self) -> Result<()>;
}
