use std::time::Duration;

use docseek_config::TimeoutConfig;

/// Picks a request timeout from the request path.
///
/// Rules are checked in order and the first marker contained in the path
/// wins, so indexing beats content retrieval beats search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutPolicy {
    rules: Vec<(String, Duration)>,
    default: Duration,
}

impl TimeoutPolicy {
    pub fn new(rules: Vec<(String, Duration)>, default: Duration) -> Self {
        Self { rules, default }
    }

    pub fn from_config(config: &TimeoutConfig) -> Self {
        Self::new(
            vec![
                (
                    config.index_marker.clone(),
                    Duration::from_secs(config.index_secs),
                ),
                (
                    config.content_marker.clone(),
                    Duration::from_secs(config.content_secs),
                ),
                (
                    config.search_marker.clone(),
                    Duration::from_secs(config.search_secs),
                ),
            ],
            Duration::from_secs(config.default_secs),
        )
    }

    pub fn resolve(&self, path: &str) -> Duration {
        self.rules
            .iter()
            .find(|(marker, _)| path.contains(marker.as_str()))
            .map_or(self.default, |(_, timeout)| *timeout)
    }

    pub fn default_timeout(&self) -> Duration {
        self.default
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self::from_config(&TimeoutConfig::default())
    }
}
