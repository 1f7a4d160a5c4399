//! Channel variants and the async page surface
//!
//! One concrete [`Channel`] struct covers all three variants; a
//! [`ChannelKind`] tag selects which backing log (if any) `page` consults.
//! State and the virtual buffer live behind one per-channel `RwLock`, so
//! read-modify-write pairs like the unread counter and the seen-days set can
//! never interleave badly; channels are independent and need no cross-channel
//! coordination.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::clock::{MonotonicTimestamp, TimeSource};
use super::errors::TimelineError;
use super::event::{Event, VirtualMessage};
use super::merge::{inject_date_markers, interleave};
use super::order::Window;
use super::state::ChannelState;
use super::virtual_store::VirtualStore;
use crate::config::Config;
use crate::core_log::{MessageLog, ReadOpts};

/// Which backing log a channel reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Shared channel-message store
    Persisted,
    /// No log at all; the timeline is virtual events only
    Virtual,
    /// Private-message store keyed by the peer's public key
    DirectMessage,
}

/// Options for one page request
#[derive(Debug, Clone, Copy, Default)]
pub struct PageOpts {
    /// Maximum events in the page; falls back to the configured default
    pub limit: Option<usize>,
    /// Exclusive lower timestamp bound
    pub gt: Option<f64>,
    /// Exclusive upper timestamp bound
    pub lt: Option<f64>,
}

impl PageOpts {
    /// Request the most recent `limit` events
    pub fn limit(limit: usize) -> Self {
        PageOpts {
            limit: Some(limit),
            ..Default::default()
        }
    }
}

/// Mutable channel internals guarded by one lock
struct ChannelShared {
    state: ChannelState,
    virtuals: VirtualStore,
}

/// One channel's timeline and state
pub struct Channel {
    name: String,
    kind: ChannelKind,
    log: Option<Arc<dyn MessageLog>>,
    clock: Arc<dyn TimeSource>,
    config: Arc<Config>,
    shared: RwLock<ChannelShared>,
}

impl Channel {
    fn build(
        name: String,
        kind: ChannelKind,
        log: Option<Arc<dyn MessageLog>>,
        clock: Arc<dyn TimeSource>,
        config: Arc<Config>,
        state: ChannelState,
    ) -> Self {
        let generator = Arc::new(MonotonicTimestamp::new(clock.clone()));
        let shared = ChannelShared {
            state,
            virtuals: VirtualStore::new(name.clone(), generator),
        };
        Self {
            name,
            kind,
            log,
            clock,
            config,
            shared: RwLock::new(shared),
        }
    }

    /// A channel backed by the shared message store
    pub fn persisted(
        name: impl Into<String>,
        log: Arc<dyn MessageLog>,
        clock: Arc<dyn TimeSource>,
        config: Arc<Config>,
    ) -> Self {
        Self::build(
            name.into(),
            ChannelKind::Persisted,
            Some(log),
            clock,
            config,
            ChannelState::new(),
        )
    }

    /// A locally defined channel with no backing log.
    ///
    /// Starts joined: there is nothing to join remotely.
    pub fn virtual_only(
        name: impl Into<String>,
        clock: Arc<dyn TimeSource>,
        config: Arc<Config>,
    ) -> Self {
        let mut state = ChannelState::new();
        state.set_joined(true);
        Self::build(name.into(), ChannelKind::Virtual, None, clock, config, state)
    }

    /// A direct-message channel with `peer`, backed by the private-message
    /// store.
    ///
    /// Pre-seeded with the peer as a member and already joined; DMs need no
    /// explicit join.
    pub fn direct_message(
        peer: impl Into<String>,
        log: Arc<dyn MessageLog>,
        clock: Arc<dyn TimeSource>,
        config: Arc<Config>,
    ) -> Self {
        let peer = peer.into();
        let mut state = ChannelState::new();
        state.set_private(true);
        state.set_joined(true);
        state.add_member(peer.clone());
        state.set_topic(format!("private message with {peer}"));
        Self::build(
            peer,
            ChannelKind::DirectMessage,
            Some(log),
            clock,
            config,
            state,
        )
    }

    /// Channel name (peer public key for direct messages)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Which variant this channel is
    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// Whether this is a private/direct-message channel
    pub async fn is_private(&self) -> bool {
        self.shared.read().await.state.is_private()
    }

    /// Add a member; idempotent
    pub async fn add_member(&self, id: impl Into<String>) {
        self.shared.write().await.state.add_member(id);
    }

    /// Remove a member; idempotent
    pub async fn remove_member(&self, id: &str) {
        self.shared.write().await.state.remove_member(id);
    }

    /// Current members, order unspecified
    pub async fn members(&self) -> Vec<String> {
        self.shared.read().await.state.members()
    }

    /// Number of members
    pub async fn member_count(&self) -> usize {
        self.shared.read().await.state.member_count()
    }

    /// Record a mention; suppressed while focused
    pub async fn add_mention(&self, mention: Event) {
        self.shared.write().await.state.add_mention(mention);
    }

    /// Pending mentions, oldest first
    pub async fn mentions(&self) -> Vec<Event> {
        self.shared.read().await.state.mentions()
    }

    /// Count an inbound message toward the unread total
    pub async fn handle_message(&self, message: &Event) {
        self.shared.write().await.state.handle_message(message);
    }

    /// Unread messages accumulated while unfocused
    pub async fn new_message_count(&self) -> u64 {
        self.shared.read().await.state.new_message_count()
    }

    /// Clear unread count and mentions together, stamping the read time
    pub async fn mark_as_read(&self) {
        let now = self.clock.now();
        self.shared.write().await.state.mark_as_read(now);
    }

    /// Timestamp of the last `mark_as_read`
    pub async fn last_read(&self) -> f64 {
        self.shared.read().await.state.last_read()
    }

    /// Give the channel focus
    pub async fn focus(&self) {
        self.shared.write().await.state.focus();
    }

    /// Drop focus
    pub async fn unfocus(&self) {
        self.shared.write().await.state.unfocus();
    }

    /// Whether the channel has focus
    pub async fn is_focused(&self) -> bool {
        self.shared.read().await.state.is_focused()
    }

    /// Join; returns the previous joined flag
    pub async fn join(&self) -> bool {
        self.shared.write().await.state.join()
    }

    /// Leave; returns the previous joined flag
    pub async fn leave(&self) -> bool {
        self.shared.write().await.state.leave()
    }

    /// Whether we are in the channel
    pub async fn is_joined(&self) -> bool {
        self.shared.read().await.state.is_joined()
    }

    /// Hide from channel listings
    pub async fn archive(&self) {
        self.shared.write().await.state.archive();
    }

    /// Show in channel listings again
    pub async fn unarchive(&self) {
        self.shared.write().await.state.unarchive();
    }

    /// Whether the channel is archived
    pub async fn is_archived(&self) -> bool {
        self.shared.read().await.state.is_archived()
    }

    /// Set the topic
    pub async fn set_topic(&self, topic: impl Into<String>) {
        self.shared.write().await.state.set_topic(topic);
    }

    /// Current topic
    pub async fn topic(&self) -> String {
        self.shared.read().await.state.topic().to_string()
    }

    /// Append a virtual event to this channel's buffer
    pub async fn add_virtual_message(&self, message: impl Into<VirtualMessage>) {
        self.shared.write().await.virtuals.add(message.into());
    }

    /// Windowed read of the virtual buffer alone
    pub async fn virtual_messages(&self, opts: &PageOpts) -> Vec<Event> {
        let window = self.window(opts);
        self.shared.read().await.virtuals.window(&window)
    }

    /// Drop every buffered virtual event, e.g. after a backing-store reset
    pub async fn clear_virtual_messages(&self) {
        self.shared.write().await.virtuals.clear();
    }

    /// Compose one bounded, time-ordered page of this channel's timeline.
    ///
    /// Log-backed variants fetch a raw batch first; a read failure fails the
    /// whole request before any state is touched, so `dates_seen` carries no
    /// trace of failed or cancelled attempts. The virtual buffer is read
    /// after the log read completes, so appends racing the read are merged
    /// rather than lost.
    pub async fn page(&self, opts: &PageOpts) -> Result<Vec<Event>, TimelineError> {
        let window = self.window(opts);

        let batch = match &self.log {
            Some(log) => {
                let read_opts = ReadOpts {
                    limit: window.limit,
                    gt: opts.gt,
                    lt: opts.lt,
                };
                log.read(&self.name, &read_opts).await.map_err(|e| {
                    warn!(channel = %self.name, error = %e, "page request failed");
                    TimelineError::LogRead(e)
                })?
            }
            None => Vec::new(),
        };

        let mut shared = self.shared.write().await;
        let ChannelShared { state, virtuals } = &mut *shared;
        inject_date_markers(&self.name, &batch, state, virtuals);
        let page = interleave(batch, virtuals, &window);

        debug!(
            channel = %self.name,
            events = page.len(),
            limit = window.limit,
            "page composed"
        );
        Ok(page)
    }

    fn window(&self, opts: &PageOpts) -> Window {
        let limit = opts.limit.unwrap_or(self.config.default_page_limit);
        Window::new(limit, opts.gt, opts.lt)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ChannelKind::DirectMessage => {
                // chars, not bytes: a malformed key must not panic the formatter
                let short: String = self.name.chars().take(8).collect();
                write!(f, "PM-{short}")
            }
            _ => write!(f, "{}", self.name),
        }
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
