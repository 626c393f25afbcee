//! In-memory channel for dry runs and tests
//!
//! Every publish and close is forwarded as a [`ChannelEvent`] on a crossbeam
//! channel. The receiving side is optional: a detached channel (used by
//! `--dry-run`) only logs.

use super::channel_trait::{Channel, ChannelStats};
use crate::error::{ReplayError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::time::Instant;

/// Something that happened on a [`MemoryChannel`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Published { topic: String, payload: Vec<u8> },
    Closed,
}

impl ChannelEvent {
    /// Payload as text, for published events
    pub fn payload_str(&self) -> Option<&str> {
        match self {
            ChannelEvent::Published { payload, .. } => std::str::from_utf8(payload).ok(),
            ChannelEvent::Closed => None,
        }
    }
}

/// Channel that keeps everything in process
#[derive(Debug)]
pub struct MemoryChannel {
    events: Sender<ChannelEvent>,
    stats: ChannelStats,
    closed: bool,
}

impl MemoryChannel {
    /// Create a channel and the receiver observing it
    pub fn new() -> (Self, Receiver<ChannelEvent>) {
        let (tx, rx) = unbounded();
        (
            Self {
                events: tx,
                stats: ChannelStats::default(),
                closed: false,
            },
            rx,
        )
    }

    /// Create a channel nobody observes
    pub fn detached() -> Self {
        Self::new().0
    }

    /// Publish statistics so far
    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Channel for MemoryChannel {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<()> {
        if self.closed {
            self.stats.record_failure();
            return Err(ReplayError::Channel(
                "publish on closed in-memory channel".to_string(),
            ));
        }

        let start = Instant::now();
        tracing::debug!(
            "[dry-run] {} <- {}",
            topic,
            String::from_utf8_lossy(payload)
        );
        // A dropped receiver is fine: dry runs do not observe
        let _ = self.events.send(ChannelEvent::Published {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        });
        self.stats
            .record_success(start.elapsed().as_micros() as u64, payload.len() as u64);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        let _ = self.events.send(ChannelEvent::Closed);
        tracing::debug!(
            "[dry-run] channel closed after {} messages",
            self.stats.messages_sent
        );
        Ok(())
    }
}
