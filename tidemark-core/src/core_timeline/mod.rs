//! Timeline composition and per-channel state
//!
//! This module is the heart of the client core: it tracks per-channel state
//! (membership, unread counts, mentions, topic), buffers synthetic "virtual"
//! events that never reach persistent storage, and composes bounded,
//! time-ordered pages by merging the persisted log with that buffer.
//!
//! ## Key design points
//!
//! 1. One concrete [`Channel`] with a [`ChannelKind`] tag instead of a
//!    class hierarchy; the tag only selects the backing log.
//! 2. Stable multi-source sort: timestamp ascending, per-author `seq` as the
//!    only tie-break, insertion order otherwise preserved.
//! 3. Idempotent date separators: each calendar day yields exactly one
//!    `status/date-changed` event per channel lifetime, no matter how many
//!    overlapping pages are requested.
//! 4. Injectable [`TimeSource`] rather than a process-global clock.

pub mod channel;
pub mod clock;
pub mod directory;
pub mod errors;
pub mod event;
mod merge;
pub mod order;
pub mod state;
pub mod virtual_store;

pub use channel::{Channel, ChannelKind, PageOpts};
pub use clock::{MonotonicTimestamp, SystemTimeSource, TimeSource};
pub use directory::ChannelDirectory;
pub use errors::TimelineError;
pub use event::{day_key, Event, EventBody, VirtualMessage, CHAT_TEXT, DATE_CHANGED, DAY_MS, STATUS};
pub use order::{sort_timeline, take_last, timeline_cmp, Window};
pub use state::ChannelState;
pub use virtual_store::VirtualStore;
