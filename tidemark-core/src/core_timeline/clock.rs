//! Time sources and the monotonic virtual-event timestamp generator

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Supplies the current wall-clock time in milliseconds since the Unix epoch.
///
/// Injectable so tests can drive time deterministically instead of depending
/// on a process-wide clock.
pub trait TimeSource: Send + Sync {
    /// Current time in epoch milliseconds
    fn now(&self) -> f64;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> f64 {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards");
        duration.as_millis() as f64
    }
}

/// Strictly increasing timestamp generator for synthesized events.
///
/// Calls landing in the same millisecond are disambiguated with fractional
/// increments, so every timestamp issued by one generator is unique and
/// later calls always sort after earlier ones.
pub struct MonotonicTimestamp {
    source: Arc<dyn TimeSource>,
    last: Mutex<f64>,
}

impl MonotonicTimestamp {
    /// Create a generator backed by the given time source
    pub fn new(source: Arc<dyn TimeSource>) -> Self {
        Self {
            source,
            last: Mutex::new(0.0),
        }
    }

    /// Issue the next unique timestamp
    pub fn next(&self) -> f64 {
        let now = self.source.now();
        let mut last = self.last.lock().expect("timestamp state poisoned");
        let issued = if now > *last { now } else { *last + 0.001 };
        *last = issued;
        issued
    }
}

impl std::fmt::Debug for MonotonicTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonotonicTimestamp").finish_non_exhaustive()
    }
}
