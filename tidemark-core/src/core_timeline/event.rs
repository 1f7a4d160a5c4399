//! Event model shared by the persisted log and the timeline
//!
//! Persisted messages and locally synthesized virtual events share one
//! structure so the merge engine can interleave them freely. The wire shape
//! is `{ key, seq?, value: { timestamp, type, content? } }`: `key` is the
//! author's public key for persisted messages and the channel name for
//! virtual events; `seq` is the log's per-author monotonic counter and never
//! appears on virtual events.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Milliseconds in one calendar day
pub const DAY_MS: f64 = 86_400_000.0;

/// Default kind for virtual status lines
pub const STATUS: &str = "status";

/// Kind of the once-per-day separator synthesized by the merge engine
pub const DATE_CHANGED: &str = "status/date-changed";

/// Kind of an ordinary persisted chat message
pub const CHAT_TEXT: &str = "chat/text";

/// One timeline entry, persisted or virtual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Author public key, or channel name for virtual events
    pub key: String,

    /// Per-author monotonic counter assigned by the log; absent on virtual
    /// events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,

    /// Payload
    #[serde(rename = "value")]
    pub body: EventBody,
}

/// Event payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBody {
    /// Creation time in epoch milliseconds
    pub timestamp: f64,

    /// Event kind, e.g. `"chat/text"` or `"status/date-changed"`
    #[serde(rename = "type")]
    pub kind: String,

    /// Kind-specific content; date markers carry none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl Event {
    /// Create a persisted chat message
    pub fn message(
        author: impl Into<String>,
        seq: u64,
        timestamp: f64,
        text: impl Into<String>,
    ) -> Self {
        Event {
            key: author.into(),
            seq: Some(seq),
            body: EventBody {
                timestamp,
                kind: CHAT_TEXT.to_string(),
                content: Some(json!({ "text": text.into() })),
            },
        }
    }

    /// Create a virtual status line scoped to `channel`
    pub fn status(channel: impl Into<String>, timestamp: f64, text: impl Into<String>) -> Self {
        Event {
            key: channel.into(),
            seq: None,
            body: EventBody {
                timestamp,
                kind: STATUS.to_string(),
                content: Some(json!({ "text": text.into() })),
            },
        }
    }

    /// Create the day separator for the day starting at `day_start`
    pub fn date_marker(channel: impl Into<String>, day_start: f64) -> Self {
        Event {
            key: channel.into(),
            seq: None,
            body: EventBody {
                timestamp: day_start,
                kind: DATE_CHANGED.to_string(),
                content: None,
            },
        }
    }

    /// Timestamp shorthand
    pub fn timestamp(&self) -> f64 {
        self.body.timestamp
    }

    /// The DayKey of this event's timestamp
    pub fn day_key(&self) -> u64 {
        day_key(self.body.timestamp)
    }
}

/// Truncate a timestamp down to the start of its 24-hour UTC day.
///
/// Non-finite and negative timestamps map to day zero so a corrupt message
/// cannot poison the seen-days set with garbage keys.
pub fn day_key(timestamp: f64) -> u64 {
    if !timestamp.is_finite() || timestamp <= 0.0 {
        return 0;
    }
    (timestamp - timestamp % DAY_MS) as u64
}

/// Input accepted when appending to the virtual-event buffer: either a fully
/// formed event or the status-line shorthand, which gets normalized to an
/// [`Event`] keyed by the channel name.
#[derive(Debug, Clone)]
pub enum VirtualMessage {
    /// A complete event, appended as-is
    Event(Event),
    /// Shorthand for a status line
    Status {
        /// Explicit timestamp; defaulted from the monotonic generator when
        /// absent
        timestamp: Option<f64>,
        /// Event kind; defaults to `"status"`
        kind: Option<String>,
        /// Status text
        text: String,
    },
}

impl VirtualMessage {
    /// Shorthand status line with every field defaulted
    pub fn text(text: impl Into<String>) -> Self {
        VirtualMessage::Status {
            timestamp: None,
            kind: None,
            text: text.into(),
        }
    }
}

impl From<Event> for VirtualMessage {
    fn from(event: Event) -> Self {
        VirtualMessage::Event(event)
    }
}
