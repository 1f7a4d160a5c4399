//! Per-channel buffer of synthetic events
//!
//! Virtual events (status lines, date separators) live only in memory and
//! never reach the persisted log. The buffer is unordered on insert; reads
//! filter, stably sort, and truncate to a window. There is no size cap; the
//! consuming layer bounds growth by calling [`VirtualStore::clear`].

use std::sync::Arc;

use serde_json::json;

use super::clock::MonotonicTimestamp;
use super::event::{Event, EventBody, VirtualMessage, STATUS};
use super::order::{sort_timeline, take_last, Window};

/// Unordered buffer of virtual events scoped to one channel
pub struct VirtualStore {
    channel: String,
    clock: Arc<MonotonicTimestamp>,
    buffer: Vec<Event>,
}

impl VirtualStore {
    /// Create an empty buffer for `channel`, drawing default timestamps from
    /// `clock`
    pub fn new(channel: impl Into<String>, clock: Arc<MonotonicTimestamp>) -> Self {
        Self {
            channel: channel.into(),
            clock,
            buffer: Vec::new(),
        }
    }

    /// Append a virtual event.
    ///
    /// Shorthand input is normalized into a full event keyed by the channel
    /// name, with kind defaulting to `"status"` and the timestamp drawn from
    /// the monotonic generator when absent.
    pub fn add(&mut self, message: VirtualMessage) {
        let event = match message {
            VirtualMessage::Event(event) => event,
            VirtualMessage::Status {
                timestamp,
                kind,
                text,
            } => Event {
                key: self.channel.clone(),
                seq: None,
                body: EventBody {
                    timestamp: timestamp.unwrap_or_else(|| self.clock.next()),
                    kind: kind.unwrap_or_else(|| STATUS.to_string()),
                    content: Some(json!({ "text": text })),
                },
            },
        };
        self.buffer.push(event);
    }

    /// Events inside the window: exclusive-bounds filter, stable ascending
    /// sort, then the most recent `limit` entries.
    pub fn window(&self, window: &Window) -> Vec<Event> {
        let mut filtered: Vec<Event> = self
            .buffer
            .iter()
            .filter(|event| window.contains(event.timestamp()))
            .cloned()
            .collect();
        sort_timeline(&mut filtered);
        take_last(filtered, window.limit)
    }

    /// Drop every buffered event
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Number of buffered events
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl std::fmt::Debug for VirtualStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualStore")
            .field("channel", &self.channel)
            .field("buffered", &self.buffer.len())
            .finish()
    }
}
