//! Channel construction and inspection helpers

use crossbeam_channel::Receiver;
use sensor_replay::backend::{ChannelEvent, MemoryChannel};
use sensor_replay::config::ReplaySettings;
use sensor_replay::session::ReplayPublisher;
use std::time::Duration;

/// Topic used by replay tests
pub const TEST_TOPIC: &str = "test/sensors";

/// Publisher over an in-memory channel, plus the receiver observing it
pub fn create_test_publisher(interval: Duration) -> (ReplayPublisher, Receiver<ChannelEvent>) {
    let (channel, events) = MemoryChannel::new();
    let publisher = ReplayPublisher::new(
        Box::new(channel),
        ReplaySettings::new(TEST_TOPIC, interval),
    );
    (publisher, events)
}

/// Drain every event currently queued
pub fn drain_events(events: &Receiver<ChannelEvent>) -> Vec<ChannelEvent> {
    events.try_iter().collect()
}

/// Payload texts of the published events, in order
pub fn published_payloads(events: &[ChannelEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| e.payload_str().map(str::to_string))
        .collect()
}

/// Number of close events seen
pub fn close_count(events: &[ChannelEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ChannelEvent::Closed))
        .count()
}
