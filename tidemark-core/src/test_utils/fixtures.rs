//! Test fixtures for deterministic time and prebuilt events

use std::sync::{Arc, Mutex};

use crate::core_log::MemoryLog;
use crate::core_timeline::{Event, MonotonicTimestamp, TimeSource};

/// Manually driven time source for deterministic tests
pub struct ManualTimeSource {
    now: Mutex<f64>,
}

impl ManualTimeSource {
    /// Start the clock at `now` epoch milliseconds
    pub fn new(now: f64) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Jump the clock to an absolute time
    pub fn set(&self, now: f64) {
        *self.now.lock().expect("clock state poisoned") = now;
    }

    /// Advance the clock by `millis`
    pub fn advance(&self, millis: f64) {
        *self.now.lock().expect("clock state poisoned") += millis;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> f64 {
        *self.now.lock().expect("clock state poisoned")
    }
}

/// A monotonic generator over a manual source, returning both handles
pub fn manual_clock(start: f64) -> (Arc<MonotonicTimestamp>, Arc<ManualTimeSource>) {
    let source = Arc::new(ManualTimeSource::new(start));
    let clock = Arc::new(MonotonicTimestamp::new(source.clone()));
    (clock, source)
}

/// Builder for test events
pub struct TestEventBuilder {
    author: String,
    seq: Option<u64>,
    timestamp: f64,
    text: String,
}

impl TestEventBuilder {
    pub fn new() -> Self {
        Self {
            author: "test-author".to_string(),
            seq: Some(1),
            timestamp: 1_000.0,
            text: "test message".to_string(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_seq(mut self, seq: u64) -> Self {
        self.seq = Some(seq);
        self
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn build(self) -> Event {
        let mut event = Event::message(self.author, self.seq.unwrap_or(1), self.timestamp, self.text);
        event.seq = self.seq;
        event
    }
}

impl Default for TestEventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A memory log preloaded with events for one channel
pub async fn seeded_log(channel: &str, events: Vec<Event>) -> Arc<MemoryLog> {
    let log = Arc::new(MemoryLog::new());
    for event in events {
        log.append(channel, event).await;
    }
    log
}
