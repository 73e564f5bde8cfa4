use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_AUTO_START, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_WORKERS, MAX_WORKERS, MIN_PORT, MIN_WORKERS,
};

use serde::Deserialize;

/// Where the search service listens and how it is started.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Worker processes the service should run
    pub workers: u16,
    /// Start the service as soon as the app comes up
    pub auto_start: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
            auto_start: DEFAULT_AUTO_START,
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        // The port is handed to the child, so it has to be concrete.
        if self.port < MIN_PORT {
            return Err(ConfigError::service(format!(
                "service.port must be >= {}, got {}",
                MIN_PORT, self.port
            )));
        }

        if self.workers < MIN_WORKERS || self.workers > MAX_WORKERS {
            return Err(ConfigError::service(format!(
                "service.workers must be {}-{}, got {}",
                MIN_WORKERS, MAX_WORKERS, self.workers
            )));
        }

        if self.host.trim().is_empty() || self.host.contains(char::is_whitespace) {
            return Err(ConfigError::service(format!(
                "service.host must be a host name or address, got {:?}",
                self.host
            )));
        }

        Ok(())
    }

    /// Base URL the service answers on.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
