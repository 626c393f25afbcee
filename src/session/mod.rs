//! Replay session module
//!
//! This module turns loaded records into messages and publishes them on a
//! channel at a fixed cadence.
//!
//! # Features
//!
//! - Encode each record as `key=value` pairs in column order
//! - Publish exactly one message per record, in source order
//! - Wait one interval between records (none after the last)
//! - Close the channel once, after the last record
//! - Stop early through a shared flag (wired to Ctrl+C), still closing the channel
//!
//! # Example
//!
//! ```ignore
//! use sensor_replay::backend::MemoryChannel;
//! use sensor_replay::config::ReplaySettings;
//! use sensor_replay::session::ReplayPublisher;
//!
//! let (channel, events) = MemoryChannel::new();
//! let publisher = ReplayPublisher::new(Box::new(channel), ReplaySettings::default());
//! let report = publisher.run(dataset.records())?;
//! ```

pub mod interrupt;
pub mod message;
pub mod publisher;
pub mod types;

pub use interrupt::stop_on_ctrl_c;
pub use message::Message;
pub use publisher::ReplayPublisher;
pub use types::{ReplayOutcome, ReplayReport};
