//! Configuration error types

use thiserror::Error;

/// Errors produced while loading or validating configuration
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed or is out of range
    #[error("invalid value for {key}: {value}")]
    InvalidValue {
        /// The environment variable or field at fault
        key: &'static str,
        /// The offending raw value
        value: String,
    },
}
