use crate::service::ServiceState;

use serde::Serialize;

const FAILED_RECOVERY_HINT: &str = "Please check the logs or restart the search service.";

/// Snapshot of the supervisor handed to windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatus {
    pub state: String,
    pub port: Option<u16>,
    pub base_url: String,
    pub pid: Option<u32>,
    /// RFC 3339 time the service became healthy, while running
    pub started_at: Option<String>,
    pub error: Option<String>,
    pub recovery_hint: Option<String>,
    pub is_running: bool,
}

impl ServiceStatus {
    /// `last_error` is reported while stopped so a window that missed the
    /// transient Failed state still learns why the last start failed.
    /// `recovery_hint` belongs to that error; without one a generic hint is
    /// given.
    pub fn build(
        state: &ServiceState,
        base_url: &str,
        pid: Option<u32>,
        has_process: bool,
        started_at: Option<&str>,
        last_error: Option<&str>,
        recovery_hint: Option<&str>,
    ) -> Self {
        let (port, error) = match state {
            ServiceState::Running { port } => (Some(*port), None),
            ServiceState::Failed { error } => (None, Some(error.clone())),
            ServiceState::Stopped => (None, last_error.map(String::from)),
            ServiceState::Starting => (None, None),
        };

        let recovery_hint = error
            .as_ref()
            .map(|_| String::from(recovery_hint.unwrap_or(FAILED_RECOVERY_HINT)));
        let is_running = matches!(state, ServiceState::Running { .. }) && has_process;
        let started_at = started_at.filter(|_| is_running).map(String::from);

        Self {
            state: state.label().into(),
            port,
            base_url: base_url.into(),
            pid,
            started_at,
            error,
            recovery_hint,
            is_running,
        }
    }
}
