//! Replay session data types

use std::fmt;
use std::time::Duration;

/// How a replay ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplayOutcome {
    /// Every record was published
    #[default]
    Completed,
    /// The stop flag was cleared before the last record
    Interrupted,
}

impl ReplayOutcome {
    /// Check if every record was published
    pub fn is_completed(&self) -> bool {
        matches!(self, ReplayOutcome::Completed)
    }

    /// Display name for the outcome
    pub fn display_name(&self) -> &'static str {
        match self {
            ReplayOutcome::Completed => "Completed",
            ReplayOutcome::Interrupted => "Interrupted",
        }
    }
}

impl fmt::Display for ReplayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Summary of one finished replay
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplayReport {
    /// Records handed to the publisher
    pub total_records: usize,
    /// Messages accepted by the channel
    pub messages_sent: usize,
    /// Payload bytes accepted by the channel
    pub bytes_sent: usize,
    /// Wall-clock time from first publish to close
    pub elapsed: Duration,
    pub outcome: ReplayOutcome,
}

impl ReplayReport {
    pub fn new(total_records: usize) -> Self {
        Self {
            total_records,
            ..Default::default()
        }
    }

    /// Account for one published message
    pub fn record_sent(&mut self, bytes: usize) {
        self.messages_sent += 1;
        self.bytes_sent += bytes;
    }

    /// Records that were never published
    pub fn remaining(&self) -> usize {
        self.total_records.saturating_sub(self.messages_sent)
    }
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} messages, {} bytes in {:.1}s",
            self.outcome,
            self.messages_sent,
            self.total_records,
            self.bytes_sent,
            self.elapsed.as_secs_f64()
        )
    }
}
