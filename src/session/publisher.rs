//! Replay publisher: one message per record, one interval apart

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::Channel;
use crate::config::ReplaySettings;
use crate::error::{Result, ResultExt};
use crate::types::Record;

use super::message::Message;
use super::types::{ReplayOutcome, ReplayReport};

/// Longest single sleep while pacing, so a stop request is seen promptly
const PACE_SLICE: Duration = Duration::from_millis(50);

/// Publishes a finite sequence of records on a channel at a fixed cadence
///
/// The publisher owns the channel and consumes itself in [`run`](Self::run),
/// so the channel is closed at most once.
pub struct ReplayPublisher {
    channel: Box<dyn Channel>,
    settings: ReplaySettings,
    running: Arc<AtomicBool>,
}

impl std::fmt::Debug for ReplayPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayPublisher")
            .field("settings", &self.settings)
            .field("running", &self.running.load(Ordering::Relaxed))
            .finish()
    }
}

impl ReplayPublisher {
    /// Create a publisher over an open channel
    pub fn new(channel: Box<dyn Channel>, settings: ReplaySettings) -> Self {
        Self {
            channel,
            settings,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get a handle to stop the replay; store `false` to stop
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn settings(&self) -> &ReplaySettings {
        &self.settings
    }

    /// Replay `records` in order, then close the channel.
    ///
    /// The first publish failure is returned as-is and the channel is left
    /// unclosed. No wait follows the last record.
    pub fn run(mut self, records: &[Record]) -> Result<ReplayReport> {
        let interval = self.settings.interval();
        let mut report = ReplayReport::new(records.len());
        let started = Instant::now();

        tracing::info!(
            "Replaying {} records on '{}' every {:?}",
            records.len(),
            self.settings.topic,
            interval
        );

        for (index, record) in records.iter().enumerate() {
            if !self.running.load(Ordering::SeqCst) {
                report.outcome = ReplayOutcome::Interrupted;
                break;
            }

            let message = Message::encode(record);
            self.channel
                .publish(&self.settings.topic, message.as_bytes())
                .with_context(|| format!("Replay aborted at record {}", index))?;
            report.record_sent(message.len());

            let sent = serde_json::to_string(record).unwrap_or_else(|_| message.to_string());
            tracing::info!("Sent: {}", sent);

            let is_last = index + 1 == records.len();
            if !is_last && !pace(interval, &self.running) {
                report.outcome = ReplayOutcome::Interrupted;
                break;
            }
        }

        self.channel.close()?;
        report.elapsed = started.elapsed();

        if report.outcome.is_completed() {
            tracing::info!("Replay finished: {}", report);
        } else {
            tracing::warn!(
                "Replay stopped early, {} records not sent: {}",
                report.remaining(),
                report
            );
        }
        Ok(report)
    }
}

/// Block for `interval` unless `running` is cleared first.
///
/// Returns whether the replay should continue.
fn pace(interval: Duration, running: &AtomicBool) -> bool {
    let deadline = Instant::now() + interval;
    loop {
        if !running.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        std::thread::sleep((deadline - now).min(PACE_SLICE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::channel_trait::MockChannel;
    use crate::error::ReplayError;
    use crate::types::TIMESTAMP_COLUMN;
    use chrono::NaiveDate;
    use mockall::Sequence;

    fn records(n: usize) -> Vec<Record> {
        let base = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| {
                Record::default()
                    .with(TIMESTAMP_COLUMN, base + chrono::Duration::seconds(i as i64))
                    .with("soil", 300 + i as i64)
            })
            .collect()
    }

    fn settings(interval_ms: u64) -> ReplaySettings {
        ReplaySettings {
            topic: "test/topic".to_string(),
            interval_ms,
        }
    }

    #[test]
    fn test_publishes_in_order_then_closes_once() {
        let input = records(3);
        let mut mock = MockChannel::new();
        let mut seq = Sequence::new();

        for record in &input {
            let expected = Message::encode(record).into_string();
            mock.expect_publish()
                .times(1)
                .in_sequence(&mut seq)
                .withf(move |topic: &str, payload: &[u8]| {
                    topic == "test/topic" && payload == expected.as_bytes()
                })
                .returning(|_, _| Ok(()));
        }
        mock.expect_close()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let report = ReplayPublisher::new(Box::new(mock), settings(0))
            .run(&input)
            .unwrap();

        assert_eq!(report.messages_sent, 3);
        assert_eq!(report.outcome, ReplayOutcome::Completed);
    }

    #[test]
    fn test_publish_failure_aborts_without_close() {
        let input = records(5);
        let mut mock = MockChannel::new();
        let mut calls = 0;
        mock.expect_publish().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 2 {
                Err(ReplayError::Channel("broker gone".to_string()))
            } else {
                Ok(())
            }
        });
        mock.expect_close().times(0);

        let err = ReplayPublisher::new(Box::new(mock), settings(0))
            .run(&input)
            .unwrap_err();

        assert!(err.to_string().contains("record 1"));
        assert!(err.to_string().contains("broker gone"));
    }

    #[test]
    fn test_empty_input_still_closes() {
        let mut mock = MockChannel::new();
        mock.expect_publish().times(0);
        mock.expect_close().times(1).returning(|| Ok(()));

        let report = ReplayPublisher::new(Box::new(mock), settings(1000))
            .run(&[])
            .unwrap();
        assert_eq!(report.messages_sent, 0);
        assert!(report.elapsed < Duration::from_millis(500));
    }

    #[test]
    fn test_close_failure_is_returned() {
        let mut mock = MockChannel::new();
        mock.expect_publish().returning(|_, _| Ok(()));
        mock.expect_close()
            .times(1)
            .returning(|| Err(ReplayError::Channel("disconnect failed".to_string())));

        let result = ReplayPublisher::new(Box::new(mock), settings(0)).run(&records(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_stop_before_start() {
        let mut mock = MockChannel::new();
        mock.expect_publish().times(0);
        mock.expect_close().times(1).returning(|| Ok(()));

        let publisher = ReplayPublisher::new(Box::new(mock), settings(0));
        publisher.stop_handle().store(false, Ordering::SeqCst);

        let report = publisher.run(&records(4)).unwrap();
        assert_eq!(report.outcome, ReplayOutcome::Interrupted);
        assert_eq!(report.remaining(), 4);
    }

    #[test]
    fn test_pace_waits_full_interval() {
        let running = AtomicBool::new(true);
        let start = Instant::now();
        assert!(pace(Duration::from_millis(30), &running));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_pace_returns_early_when_stopped() {
        let running = AtomicBool::new(false);
        let start = Instant::now();
        assert!(!pace(Duration::from_secs(10), &running));
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
