//! Shared test utilities
//!
//! Deterministic time sources and event fixtures used by unit and
//! integration tests.

mod fixtures;

pub use fixtures::{
    manual_clock, seeded_log, ManualTimeSource, TestEventBuilder,
};
