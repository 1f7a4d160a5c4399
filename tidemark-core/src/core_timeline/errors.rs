//! Timeline error taxonomy

use thiserror::Error;

use crate::core_log::LogError;

/// Errors surfaced by page composition.
///
/// Everything else in this core is an infallible in-memory mutation; only a
/// backing-log read can fail, and a failed read fails the whole page request
/// with no partial results and no state mutation.
#[derive(Debug, Clone, Error)]
pub enum TimelineError {
    /// The backing log errored or timed out
    #[error("backing log read failed: {0}")]
    LogRead(#[from] LogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_error_converts() {
        let err: TimelineError = LogError::Timeout.into();
        assert_eq!(
            err.to_string(),
            "backing log read failed: log read timed out"
        );
    }
}
