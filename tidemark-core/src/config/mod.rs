//! Configuration for the timeline core
//!
//! Environment-based configuration with defaults and validation. The core
//! itself has very few knobs; everything network- or storage-related belongs
//! to the collaborating log layer.

use serde::{Deserialize, Serialize};
use std::env;

mod error;

pub use error::ConfigError;

/// Environment variable overriding the default page limit
const ENV_PAGE_LIMIT: &str = "TIDEMARK_PAGE_LIMIT";

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Page size used when a page request does not carry an explicit limit
    pub default_page_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_limit: 100,
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Ok(raw) = env::var(ENV_PAGE_LIMIT) {
            config.default_page_limit =
                raw.parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: ENV_PAGE_LIMIT,
                        value: raw,
                    })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: ENV_PAGE_LIMIT,
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}
