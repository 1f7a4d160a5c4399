//! Pure per-channel state machine
//!
//! [`ChannelState`] tracks membership, unread/mention bookkeeping, read and
//! focus flags, topic, and the set of calendar days already given a date
//! marker. It performs no I/O and never fails; callers serialize access
//! through the owning [`Channel`](super::channel::Channel) lock.

use std::collections::HashSet;

use super::event::Event;

/// In-memory state for one channel
#[derive(Debug, Default)]
pub struct ChannelState {
    is_private: bool,
    members: HashSet<String>,
    mentions: Vec<Event>,
    archived: bool,
    new_message_count: u64,
    dates_seen: HashSet<u64>,
    last_read: f64,
    joined: bool,
    focused: bool,
    topic: String,
}

impl ChannelState {
    /// Fresh state with every flag cleared
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this channel is a private/direct-message scope
    pub fn is_private(&self) -> bool {
        self.is_private
    }

    pub(crate) fn set_private(&mut self, private: bool) {
        self.is_private = private;
    }

    /// Add a member; adding an existing member is a no-op
    pub fn add_member(&mut self, id: impl Into<String>) {
        self.members.insert(id.into());
    }

    /// Remove a member; removing an unknown member is a no-op
    pub fn remove_member(&mut self, id: &str) {
        self.members.remove(id);
    }

    /// Current members, order unspecified
    pub fn members(&self) -> Vec<String> {
        self.members.iter().cloned().collect()
    }

    /// Number of members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Record a mention. Suppressed entirely while the channel is focused.
    pub fn add_mention(&mut self, mention: Event) {
        if !self.focused {
            self.mentions.push(mention);
        }
    }

    /// Copy of the pending mentions, oldest first
    pub fn mentions(&self) -> Vec<Event> {
        self.mentions.clone()
    }

    /// Count an inbound message toward the unread total.
    ///
    /// Every delivery counts while unfocused; there is no dedup by message
    /// key, so a log layer that redelivers will double-count.
    pub fn handle_message(&mut self, _message: &Event) {
        if !self.focused {
            self.new_message_count += 1;
        }
    }

    /// Unread messages accumulated while unfocused
    pub fn new_message_count(&self) -> u64 {
        self.new_message_count
    }

    /// Mark everything read as of `now`: clears the unread counter and the
    /// mention queue together.
    pub fn mark_as_read(&mut self, now: f64) {
        self.last_read = now;
        self.new_message_count = 0;
        self.mentions.clear();
    }

    /// Timestamp of the last `mark_as_read`
    pub fn last_read(&self) -> f64 {
        self.last_read
    }

    /// Give the channel focus. Does not retroactively clear unread state.
    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Drop focus
    pub fn unfocus(&mut self) {
        self.focused = false;
    }

    /// Whether the channel currently has focus
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Join the channel, returning the previous joined flag so callers can
    /// detect "already joined".
    pub fn join(&mut self) -> bool {
        let was_joined = self.joined;
        self.joined = true;
        was_joined
    }

    /// Leave the channel, returning the previous joined flag
    pub fn leave(&mut self) -> bool {
        let was_joined = self.joined;
        self.joined = false;
        was_joined
    }

    pub(crate) fn set_joined(&mut self, joined: bool) {
        self.joined = joined;
    }

    /// Whether we are currently in the channel
    pub fn is_joined(&self) -> bool {
        self.joined
    }

    /// Hide the channel from listings; membership and messages are untouched
    pub fn archive(&mut self) {
        self.archived = true;
    }

    /// Make the channel visible in listings again
    pub fn unarchive(&mut self) {
        self.archived = false;
    }

    /// Whether the channel is archived
    pub fn is_archived(&self) -> bool {
        self.archived
    }

    /// Set the channel topic
    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    /// Current topic
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Record a calendar day as seen. Returns true the first time a DayKey
    /// is presented; the set only ever grows.
    pub fn mark_day_seen(&mut self, day: u64) -> bool {
        self.dates_seen.insert(day)
    }

    /// Number of distinct days already given a date marker
    pub fn days_seen(&self) -> usize {
        self.dates_seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(ts: f64) -> Event {
        Event::message("someone", 1, ts, "hey you")
    }

    #[test]
    fn test_membership_is_idempotent() {
        let mut state = ChannelState::new();
        state.add_member("alice");
        state.add_member("alice");
        assert_eq!(state.member_count(), 1);

        state.remove_member("alice");
        state.remove_member("alice");
        assert_eq!(state.member_count(), 0);
    }

    #[test]
    fn test_remove_unknown_member_is_noop() {
        let mut state = ChannelState::new();
        state.add_member("alice");
        state.remove_member("bob");
        assert_eq!(state.members(), vec!["alice".to_string()]);
    }

    #[test]
    fn test_mentions_suppressed_while_focused() {
        let mut state = ChannelState::new();
        state.add_mention(mention(1.0));
        state.focus();
        state.add_mention(mention(2.0));
        state.add_mention(mention(3.0));
        state.unfocus();
        state.add_mention(mention(4.0));

        let mentions = state.mentions();
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].timestamp(), 1.0);
        assert_eq!(mentions[1].timestamp(), 4.0);
    }

    #[test]
    fn test_unread_counter_suppressed_while_focused() {
        let mut state = ChannelState::new();
        let msg = mention(1.0);
        state.handle_message(&msg);
        state.focus();
        state.handle_message(&msg);
        state.unfocus();
        state.handle_message(&msg);
        assert_eq!(state.new_message_count(), 2);
    }

    #[test]
    fn test_redelivery_double_counts() {
        let mut state = ChannelState::new();
        let msg = mention(1.0);
        state.handle_message(&msg);
        state.handle_message(&msg);
        assert_eq!(state.new_message_count(), 2);
    }

    #[test]
    fn test_mark_as_read_resets_everything() {
        let mut state = ChannelState::new();
        let msg = mention(1.0);
        state.handle_message(&msg);
        state.add_mention(msg);
        state.mark_as_read(5_000.0);

        assert_eq!(state.new_message_count(), 0);
        assert!(state.mentions().is_empty());
        assert_eq!(state.last_read(), 5_000.0);
    }

    #[test]
    fn test_focus_does_not_clear_existing_unread_state() {
        let mut state = ChannelState::new();
        let msg = mention(1.0);
        state.handle_message(&msg);
        state.add_mention(msg);
        state.focus();
        assert_eq!(state.new_message_count(), 1);
        assert_eq!(state.mentions().len(), 1);
    }

    #[test]
    fn test_join_and_leave_report_previous_value() {
        let mut state = ChannelState::new();
        assert!(!state.join());
        assert!(state.join());
        assert!(state.leave());
        assert!(!state.leave());
    }

    #[test]
    fn test_archive_leaves_membership_alone() {
        let mut state = ChannelState::new();
        state.add_member("alice");
        state.archive();
        assert!(state.is_archived());
        assert_eq!(state.member_count(), 1);
        state.unarchive();
        assert!(!state.is_archived());
    }

    #[test]
    fn test_days_seen_only_grows() {
        let mut state = ChannelState::new();
        assert!(state.mark_day_seen(0));
        assert!(!state.mark_day_seen(0));
        assert!(state.mark_day_seen(86_400_000));
        assert_eq!(state.days_seen(), 2);
    }
}
