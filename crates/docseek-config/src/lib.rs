mod config;
mod error;
mod launch_config;
mod log_level;
mod logging_config;
mod service_config;
mod supervisor_config;
mod timeout_config;
mod window_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use launch_config::LaunchConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use service_config::ServiceConfig;
pub use supervisor_config::SupervisorConfig;
pub use timeout_config::TimeoutConfig;
pub use window_config::WindowConfig;

pub const CONFIG_DIR_ENV: &str = "DOCSEEK_CONFIG_DIR";
pub const CONFIG_FILENAME: &str = "config.toml";
const DEFAULT_CONFIG_DIR: &str = ".docseek";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8765;
const DEFAULT_WORKERS: u16 = 1;
const DEFAULT_AUTO_START: bool = true;
const MIN_PORT: u16 = 1024;
const MIN_WORKERS: u16 = 1;
const MAX_WORKERS: u16 = 64;

const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_MAX_HEALTH_ATTEMPTS: u32 = 15;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

const DEFAULT_ENTRY_SCRIPT: &str = "service/main.py";

const DEFAULT_INDEX_MARKER: &str = "/index";
const DEFAULT_CONTENT_MARKER: &str = "/content";
const DEFAULT_SEARCH_MARKER: &str = "/search";
const DEFAULT_INDEX_TIMEOUT_SECS: u64 = 30 * 60;
const DEFAULT_CONTENT_TIMEOUT_SECS: u64 = 2 * 60;
const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "logs";
const DEFAULT_MAX_LOG_FILES: usize = 7;
