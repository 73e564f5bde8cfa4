//! Resolution of the command that starts the search service.

use crate::service::{LaunchCommand, ServiceError, ServiceResult};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use docseek_config::Config;
use tracing::info;

/// Name of the packaged service executable shipped next to the app.
pub const BUNDLED_EXECUTABLE: &str = "docseek-service";

/// Environment variable pointing the child at its own resources.
pub const SERVICE_DIR_ENV: &str = "DOCSEEK_SERVICE_DIR";

/// Interpreters tried on PATH when none is configured.
const INTERPRETER_CANDIDATES: &[&str] = &["python3", "python"];

/// Decides how the service is launched.
///
/// Search order:
/// 1. `launch.executable` from config
/// 2. Bundled executable next to the current binary
/// 3. Interpreter running `launch.entry_script` (configured, else found on PATH)
#[derive(Debug, Clone)]
pub struct LaunchResolver {
    host: String,
    port: u16,
    workers: u16,
    service_dir: PathBuf,
    executable: Option<PathBuf>,
    bundle_dir: Option<PathBuf>,
    interpreter: Option<PathBuf>,
    entry_script: PathBuf,
    search_path: Option<OsString>,
}

impl LaunchResolver {
    pub fn new(host: impl Into<String>, port: u16, service_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            port,
            workers: 1,
            service_dir: service_dir.into(),
            executable: None,
            bundle_dir: None,
            interpreter: None,
            entry_script: PathBuf::from("service/main.py"),
            search_path: None,
        }
    }

    /// `service_dir` comes from `Config::service_dir`, resolved by the caller.
    pub fn from_config(config: &Config, service_dir: PathBuf) -> Self {
        let bundle_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        Self::new(&config.service.host, config.service.port, service_dir)
            .with_workers(config.service.workers)
            .with_executable(config.launch.executable.as_ref().map(PathBuf::from))
            .with_bundle_dir(bundle_dir)
            .with_interpreter(config.launch.interpreter.as_ref().map(PathBuf::from))
            .with_entry_script(&config.launch.entry_script)
    }

    pub fn with_workers(mut self, workers: u16) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_executable(mut self, executable: Option<PathBuf>) -> Self {
        self.executable = executable;
        self
    }

    pub fn with_bundle_dir(mut self, bundle_dir: Option<PathBuf>) -> Self {
        self.bundle_dir = bundle_dir;
        self
    }

    pub fn with_interpreter(mut self, interpreter: Option<PathBuf>) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_entry_script(mut self, entry_script: impl Into<PathBuf>) -> Self {
        self.entry_script = entry_script.into();
        self
    }

    /// Override the PATH used for interpreter discovery.
    pub fn with_search_path(mut self, search_path: Option<OsString>) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn resolve(&self) -> ServiceResult<LaunchCommand> {
        if let Some(executable) = &self.executable {
            info!("Using service executable (configured): {}", executable.display());
            return Ok(self.command(executable.clone(), Vec::new()));
        }

        if let Some(bundled) = self.bundled_executable() {
            info!("Using service executable (bundled): {}", bundled.display());
            return Ok(self.command(bundled, Vec::new()));
        }

        let interpreter = self.find_interpreter().ok_or_else(|| {
            ServiceError::spawn_failure(
                BUNDLED_EXECUTABLE,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no bundled service executable and no interpreter on PATH; \
                     set launch.executable or launch.interpreter",
                ),
            )
        })?;

        let script = if self.entry_script.is_absolute() {
            self.entry_script.clone()
        } else {
            self.service_dir.join(&self.entry_script)
        };

        info!(
            "Using interpreter {} with {}",
            interpreter.display(),
            script.display()
        );
        Ok(self.command(interpreter, vec![script.display().to_string()]))
    }

    fn bundled_executable(&self) -> Option<PathBuf> {
        let dir = self.bundle_dir.as_ref()?;
        let candidate = dir.join(format!("{BUNDLED_EXECUTABLE}{}", std::env::consts::EXE_SUFFIX));
        candidate.is_file().then_some(candidate)
    }

    fn find_interpreter(&self) -> Option<PathBuf> {
        if let Some(interpreter) = &self.interpreter {
            return Some(interpreter.clone());
        }

        let path = self
            .search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"))?;

        std::env::split_paths(&path).find_map(|dir| {
            INTERPRETER_CANDIDATES.iter().find_map(|name| {
                let candidate = dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX));
                candidate.is_file().then_some(candidate)
            })
        })
    }

    fn command(&self, program: PathBuf, mut args: Vec<String>) -> LaunchCommand {
        args.extend([
            String::from("--host"),
            self.host.clone(),
            String::from("--port"),
            self.port.to_string(),
            String::from("--workers"),
            self.workers.to_string(),
        ]);

        LaunchCommand {
            program,
            args,
            current_dir: self.service_dir.clone(),
            env: vec![(
                String::from(SERVICE_DIR_ENV),
                self.service_dir.display().to_string(),
            )],
        }
    }
}
