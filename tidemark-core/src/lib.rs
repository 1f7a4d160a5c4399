//! Tidemark core
//!
//! Per-channel timeline composition and state tracking for a group-chat
//! client. Each channel owns its membership, unread/mention bookkeeping, and
//! topic metadata, and serves bounded, time-ordered pages of events by
//! merging a persisted append-only log with in-memory virtual events such as
//! status lines and date separators.
//!
//! The persisted log itself, the network/identity layer, and any rendering
//! surface are external collaborators; see [`core_log::MessageLog`] for the
//! contract this core consumes.

pub mod config;
pub mod core_log;
pub mod core_timeline;
pub mod logging;
pub mod test_utils;

pub use config::Config;
pub use core_log::{LogError, MemoryLog, MessageLog, ReadOpts};
pub use core_timeline::{
    Channel, ChannelDirectory, ChannelKind, ChannelState, Event, EventBody, MonotonicTimestamp,
    PageOpts, SystemTimeSource, TimeSource, TimelineError, VirtualMessage, VirtualStore, Window,
};
pub use logging::{init_logging, LogLevel};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = LogLevel::Info;
        let _ = Config::default();
        let _ = PageOpts::default();
    }
}
