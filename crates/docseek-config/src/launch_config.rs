use crate::DEFAULT_ENTRY_SCRIPT;

use serde::Deserialize;

/// How the service process is located on disk.
///
/// Everything is optional: the supervisor looks for a bundled executable
/// next to the running binary and otherwise discovers an interpreter on
/// `PATH` to run `entry_script`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Explicit path to a packaged service executable
    pub executable: Option<String>,
    /// Explicit interpreter for the fallback invocation
    pub interpreter: Option<String>,
    /// Entry script, relative to `service_dir` unless absolute
    pub entry_script: String,
    /// Working directory of the child; defaults to the config directory
    pub service_dir: Option<String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            executable: None,
            interpreter: None,
            entry_script: String::from(DEFAULT_ENTRY_SCRIPT),
            service_dir: None,
        }
    }
}
