//! Timeline merge engine
//!
//! Composes one bounded page from a persisted batch and the virtual-event
//! buffer: scan the batch for first-seen calendar days and synthesize date
//! markers, then interleave, stably sort with the tie-break comparator, and
//! truncate to the requested window.

use super::event::{day_key, Event};
use super::order::{sort_timeline, take_last, timeline_cmp, Window};
use super::state::ChannelState;
use super::virtual_store::VirtualStore;

/// Scan a persisted batch newest-to-oldest and append one date marker to the
/// virtual buffer for every calendar day not yet seen by this channel.
///
/// The marker carries the DayKey timestamp (day start) so it sorts before
/// the day's messages. `dates_seen` deduplication makes this idempotent
/// across overlapping page requests; the log's native ordering is not
/// trusted, so the scan sorts its own copy.
pub(crate) fn inject_date_markers(
    channel: &str,
    batch: &[Event],
    state: &mut ChannelState,
    virtuals: &mut VirtualStore,
) {
    let mut scan: Vec<&Event> = batch.iter().collect();
    scan.sort_by(|a, b| timeline_cmp(b, a));

    for message in scan {
        let day = day_key(message.timestamp());
        if state.mark_day_seen(day) {
            virtuals.add(Event::date_marker(channel, day as f64).into());
        }
    }
}

/// Merge a persisted batch with the windowed virtual buffer into one
/// ascending, bounded page.
///
/// The virtual window precedes the batch in the pre-sort sequence, so at
/// equal timestamps (with no seq tie-break) virtual events keep their place
/// ahead of persisted ones under the stable sort.
pub(crate) fn interleave(
    mut batch: Vec<Event>,
    virtuals: &VirtualStore,
    window: &Window,
) -> Vec<Event> {
    let mut merged = virtuals.window(window);
    sort_timeline(&mut batch);
    merged.append(&mut batch);
    sort_timeline(&mut merged);
    take_last(merged, window.limit)
}
