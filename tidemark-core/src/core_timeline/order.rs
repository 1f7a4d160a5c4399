//! Ordering primitives for the merged timeline
//!
//! The comparator and sort here are the backbone of page composition:
//! the sort must be stable so that events sharing a timestamp keep their
//! relative insertion order unless the per-author sequence number says
//! otherwise.

use std::cmp::Ordering;

use super::event::Event;

/// Timeline comparator.
///
/// Primary key is the timestamp, ascending. On exact equality the tie breaks
/// by ascending `seq`, but only when both events come from the same author
/// and both carry a sequence number; in every other case the pair is treated
/// as equal and the stable sort preserves their existing order. NaN
/// timestamps also fall through to "equal" rather than panicking or
/// reordering.
pub fn timeline_cmp(a: &Event, b: &Event) -> Ordering {
    match a.body.timestamp.partial_cmp(&b.body.timestamp) {
        Some(Ordering::Equal) | None => {
            if a.key == b.key {
                if let (Some(sa), Some(sb)) = (a.seq, b.seq) {
                    return sa.cmp(&sb);
                }
            }
            Ordering::Equal
        }
        Some(ordering) => ordering,
    }
}

/// Stable ascending sort by [`timeline_cmp`]
pub fn sort_timeline(events: &mut [Event]) {
    events.sort_by(timeline_cmp);
}

/// Keep the most recent `limit` entries of an ascending sequence.
///
/// Shorter inputs come back unchanged; there is no padding.
pub fn take_last(mut events: Vec<Event>, limit: usize) -> Vec<Event> {
    if events.len() > limit {
        events.drain(..events.len() - limit);
    }
    events
}

/// Exclusive timestamp window with defaulted bounds
#[derive(Debug, Clone, Copy)]
pub struct Window {
    /// Maximum number of entries in the result
    pub limit: usize,
    /// Exclusive lower bound
    pub gt: f64,
    /// Exclusive upper bound
    pub lt: f64,
}

impl Window {
    /// Build a window; absent bounds are unbounded.
    ///
    /// NaN bounds behave as if absent rather than failing the request. The
    /// lower default is -inf, not zero: a date marker for the epoch day sits
    /// at timestamp zero and must survive an unbounded request.
    pub fn new(limit: usize, gt: Option<f64>, lt: Option<f64>) -> Self {
        let gt = gt.filter(|v| !v.is_nan()).unwrap_or(f64::NEG_INFINITY);
        let lt = lt.filter(|v| !v.is_nan()).unwrap_or(f64::INFINITY);
        Self { limit, gt, lt }
    }

    /// Whether a timestamp falls strictly inside the window
    pub fn contains(&self, timestamp: f64) -> bool {
        timestamp > self.gt && timestamp < self.lt
    }
}
