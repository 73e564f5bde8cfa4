use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_MAX_HEALTH_ATTEMPTS, DEFAULT_PROBE_TIMEOUT_SECS,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Per-attempt timeout of the /health probe
    pub probe_timeout_secs: u64,
    /// Probes before a start attempt is abandoned
    pub max_health_attempts: u32,
    /// How long a concurrent caller waits on someone else's start.
    /// Unset means as long as the health-check budget allows.
    pub start_wait_secs: Option<u64>,
    /// Grace period between SIGTERM and a forced kill on stop
    pub shutdown_timeout_secs: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            max_health_attempts: DEFAULT_MAX_HEALTH_ATTEMPTS,
            start_wait_secs: None,
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

impl SupervisorConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.probe_timeout_secs == 0 {
            return Err(ConfigError::supervisor(
                "supervisor.probe_timeout_secs must be > 0",
            ));
        }

        if self.max_health_attempts == 0 {
            return Err(ConfigError::supervisor(
                "supervisor.max_health_attempts must be > 0",
            ));
        }

        if self.start_wait_secs == Some(0) {
            return Err(ConfigError::supervisor(
                "supervisor.start_wait_secs must be > 0",
            ));
        }

        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn start_wait(&self) -> Option<Duration> {
        self.start_wait_secs.map(Duration::from_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
