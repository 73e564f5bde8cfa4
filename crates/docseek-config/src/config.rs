use crate::{
    CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR,
    LaunchConfig, LoggingConfig, ServiceConfig, SupervisorConfig, TimeoutConfig, WindowConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub supervisor: SupervisorConfig,
    pub launch: LaunchConfig,
    pub timeouts: TimeoutConfig,
    pub window: WindowConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. DOCSEEK_CONFIG_DIR env var, else ./.docseek/
    /// 2. Auto-create the config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply DOCSEEK_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: DOCSEEK_CONFIG_DIR env var > ./.docseek/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.service.validate()?;
        self.supervisor.validate()?;
        self.timeouts.validate()?;
        self.window.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Absolute path of the log directory.
    pub fn log_dir(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.logging.dir))
    }

    /// Working directory for the service child.
    pub fn service_dir(&self) -> ConfigErrorResult<PathBuf> {
        match &self.launch.service_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Self::config_dir(),
        }
    }

    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  service: {} (workers={}, auto_start={})",
            self.service.base_url(),
            self.service.workers,
            self.service.auto_start
        );
        info!(
            "  supervisor: probe={}s, attempts={}, start_wait={:?}",
            self.supervisor.probe_timeout_secs,
            self.supervisor.max_health_attempts,
            self.supervisor.start_wait_secs
        );
        info!(
            "  launch: executable={:?}, interpreter={:?}, script={}",
            self.launch.executable, self.launch.interpreter, self.launch.entry_script
        );
        info!(
            "  timeouts: {}={}s, {}={}s, {}={}s, default={}s",
            self.timeouts.index_marker,
            self.timeouts.index_secs,
            self.timeouts.content_marker,
            self.timeouts.content_secs,
            self.timeouts.search_marker,
            self.timeouts.search_secs,
            self.timeouts.default_secs
        );
        info!(
            "  window: hotkey={:?}, quit_on_all_closed={:?}",
            self.window.hotkey, self.window.quit_on_all_closed
        );
        info!(
            "  logging: {} ({}, keep {} files)",
            *self.logging.level, self.logging.dir, self.logging.max_files
        );
    }

    fn apply_env_overrides(&mut self) {
        // Service
        Self::apply_env_string("DOCSEEK_SERVICE_HOST", &mut self.service.host);
        Self::apply_env_parse("DOCSEEK_SERVICE_PORT", &mut self.service.port);
        Self::apply_env_parse("DOCSEEK_SERVICE_WORKERS", &mut self.service.workers);
        Self::apply_env_bool("DOCSEEK_SERVICE_AUTO_START", &mut self.service.auto_start);

        // Supervisor
        Self::apply_env_parse(
            "DOCSEEK_PROBE_TIMEOUT_SECS",
            &mut self.supervisor.probe_timeout_secs,
        );
        Self::apply_env_parse(
            "DOCSEEK_MAX_HEALTH_ATTEMPTS",
            &mut self.supervisor.max_health_attempts,
        );
        Self::apply_env_option_parse(
            "DOCSEEK_START_WAIT_SECS",
            &mut self.supervisor.start_wait_secs,
        );

        // Launch
        Self::apply_env_option_string("DOCSEEK_SERVICE_EXECUTABLE", &mut self.launch.executable);
        Self::apply_env_option_string("DOCSEEK_INTERPRETER", &mut self.launch.interpreter);
        Self::apply_env_option_string("DOCSEEK_SERVICE_DIR", &mut self.launch.service_dir);

        // Window
        Self::apply_env_option_string("DOCSEEK_HOTKEY", &mut self.window.hotkey);

        // Logging
        Self::apply_env_parse("DOCSEEK_LOG_LEVEL", &mut self.logging.level);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for optional parseable values
    fn apply_env_option_parse<T: std::str::FromStr>(var_name: &str, target: &mut Option<T>) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = Some(parsed);
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
