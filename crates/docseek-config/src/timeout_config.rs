use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_CONTENT_MARKER, DEFAULT_CONTENT_TIMEOUT_SECS,
    DEFAULT_INDEX_MARKER, DEFAULT_INDEX_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SEARCH_MARKER, DEFAULT_SEARCH_TIMEOUT_SECS,
};

use serde::Deserialize;

/// Request timeouts keyed by path marker.
///
/// Bulk indexing runs for minutes, content retrieval for seconds and
/// searches should fail fast.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub index_marker: String,
    pub index_secs: u64,
    pub content_marker: String,
    pub content_secs: u64,
    pub search_marker: String,
    pub search_secs: u64,
    pub default_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            index_marker: String::from(DEFAULT_INDEX_MARKER),
            index_secs: DEFAULT_INDEX_TIMEOUT_SECS,
            content_marker: String::from(DEFAULT_CONTENT_MARKER),
            content_secs: DEFAULT_CONTENT_TIMEOUT_SECS,
            search_marker: String::from(DEFAULT_SEARCH_MARKER),
            search_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
            default_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl TimeoutConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        for (name, marker) in [
            ("index_marker", &self.index_marker),
            ("content_marker", &self.content_marker),
            ("search_marker", &self.search_marker),
        ] {
            if marker.is_empty() {
                return Err(ConfigError::timeouts(format!(
                    "timeouts.{name} must not be empty"
                )));
            }
        }

        for (name, secs) in [
            ("index_secs", self.index_secs),
            ("content_secs", self.content_secs),
            ("search_secs", self.search_secs),
            ("default_secs", self.default_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::timeouts(format!(
                    "timeouts.{name} must be > 0"
                )));
            }
        }

        Ok(())
    }
}
