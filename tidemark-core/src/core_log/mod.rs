//! Backing-log collaborator contract
//!
//! The persisted message log is an external collaborator: this core only
//! consumes its range-read cursor. Two instances of the same contract back
//! the channel variants, one keyed by channel name and one by recipient
//! public key.

use async_trait::async_trait;
use thiserror::Error;

use crate::core_timeline::Event;

mod memory_log;

pub use memory_log::MemoryLog;

/// Bounds for a range read against the log
#[derive(Debug, Clone, Copy)]
pub struct ReadOpts {
    /// Maximum number of events to return
    pub limit: usize,
    /// Exclusive lower timestamp bound, epoch milliseconds
    pub gt: Option<f64>,
    /// Exclusive upper timestamp bound, epoch milliseconds
    pub lt: Option<f64>,
}

/// Errors surfaced by a log read
#[derive(Debug, Clone, Error)]
pub enum LogError {
    /// The backing store failed to serve the read
    #[error("log read failed: {0}")]
    Read(String),

    /// The backing store did not answer in time
    #[error("log read timed out")]
    Timeout,
}

/// Range-read cursor over an append-only message log.
///
/// Implementations may return events in any order; the timeline engine sorts
/// for itself. A failed read must not return partial results.
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Read a bounded batch of events for `channel` within the given bounds
    async fn read(&self, channel: &str, opts: &ReadOpts) -> Result<Vec<Event>, LogError>;
}
