//! In-memory message log
//!
//! Implements the [`MessageLog`] contract over a per-channel vector. Used by
//! fixtures and embedders that want a log-backed channel without a real
//! store. Reads return newest-first, the native order of the storage layer
//! this stands in for; the timeline engine must not rely on that.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{LogError, MessageLog, ReadOpts};
use crate::core_timeline::{sort_timeline, take_last, Event, Window};

/// Append-only in-memory log keyed by channel name
#[derive(Default)]
pub struct MemoryLog {
    channels: RwLock<HashMap<String, Vec<Event>>>,
    fail_reads: AtomicBool,
}

impl MemoryLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to a channel's history
    pub async fn append(&self, channel: impl Into<String>, event: Event) {
        let mut channels = self.channels.write().await;
        channels.entry(channel.into()).or_default().push(event);
    }

    /// Make subsequent reads fail with [`LogError::Read`] until reset.
    /// Exists so tests can exercise the whole-page failure path.
    pub fn set_failing(&self, failing: bool) {
        self.fail_reads.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageLog for MemoryLog {
    async fn read(&self, channel: &str, opts: &ReadOpts) -> Result<Vec<Event>, LogError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LogError::Read("injected failure".to_string()));
        }

        let channels = self.channels.read().await;
        let window = Window::new(opts.limit, opts.gt, opts.lt);
        let mut batch: Vec<Event> = channels
            .get(channel)
            .map(|events| {
                events
                    .iter()
                    .filter(|event| window.contains(event.timestamp()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        sort_timeline(&mut batch);
        let mut batch = take_last(batch, opts.limit);
        batch.reverse();
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(seq: u64, ts: f64) -> Event {
        Event::message("author", seq, ts, "x")
    }

    fn opts(limit: usize) -> ReadOpts {
        ReadOpts {
            limit,
            gt: None,
            lt: None,
        }
    }

    #[tokio::test]
    async fn test_read_returns_newest_first() {
        let log = MemoryLog::new();
        log.append("general", msg(1, 100.0)).await;
        log.append("general", msg(2, 200.0)).await;

        let batch = log.read("general", &opts(10)).await.unwrap();
        assert_eq!(batch[0].timestamp(), 200.0);
        assert_eq!(batch[1].timestamp(), 100.0);
    }

    #[tokio::test]
    async fn test_read_applies_limit_to_newest() {
        let log = MemoryLog::new();
        for seq in 1..=5 {
            log.append("general", msg(seq, seq as f64 * 100.0)).await;
        }

        let batch = log.read("general", &opts(2)).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].timestamp(), 500.0);
        assert_eq!(batch[1].timestamp(), 400.0);
    }

    #[tokio::test]
    async fn test_read_respects_bounds() {
        let log = MemoryLog::new();
        for seq in 1..=3 {
            log.append("general", msg(seq, seq as f64 * 100.0)).await;
        }

        let batch = log
            .read(
                "general",
                &ReadOpts {
                    limit: 10,
                    gt: Some(100.0),
                    lt: Some(300.0),
                },
            )
            .await
            .unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].timestamp(), 200.0);
    }

    #[tokio::test]
    async fn test_unknown_channel_reads_empty() {
        let log = MemoryLog::new();
        let batch = log.read("missing", &opts(10)).await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let log = MemoryLog::new();
        log.set_failing(true);
        assert!(log.read("general", &opts(10)).await.is_err());

        log.set_failing(false);
        assert!(log.read("general", &opts(10)).await.is_ok());
    }
}
