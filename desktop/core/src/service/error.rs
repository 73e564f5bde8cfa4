use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Failed to spawn service process {program}: {source} {location}")]
    SpawnFailure {
        program: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error(
        "Service did not become healthy after {attempts} attempts ({elapsed_secs:.1}s): {last_error} {location}"
    )]
    HealthCheckTimeout {
        attempts: u32,
        elapsed_secs: f64,
        last_error: String,
        location: ErrorLocation,
    },

    #[error("Timed out after {waited_secs}s waiting for another start attempt {location}")]
    StartWaitTimeout {
        waited_secs: u64,
        location: ErrorLocation,
    },

    #[error("Service start was abandoned: {message} {location}")]
    StartAborted {
        message: String,
        location: ErrorLocation,
    },

    #[error("Service is not running {location}")]
    NotRunning { location: ErrorLocation },

    #[error("Request to {path} failed: {message} {location}")]
    RequestFailure {
        path: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP client error: {source} {location}")]
    Http {
        #[source]
        source: reqwest::Error,
        location: ErrorLocation,
    },
}

impl ServiceError {
    #[track_caller]
    pub fn spawn_failure(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::SpawnFailure {
            program: program.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn start_aborted(message: impl Into<String>) -> Self {
        Self::StartAborted {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_running() -> Self {
        Self::NotRunning {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn request_failure(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RequestFailure {
            path: path.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Short message suitable for a window to display.
    pub fn user_message(&self) -> String {
        match self {
            Self::SpawnFailure { program, .. } => {
                format!("Could not launch the search service ({program}).")
            }
            Self::HealthCheckTimeout { elapsed_secs, .. } => format!(
                "The search service did not respond within {elapsed_secs:.0} seconds."
            ),
            Self::StartWaitTimeout { .. } => {
                "The search service is still starting. Try again shortly.".into()
            }
            Self::StartAborted { message, .. } => {
                format!("The search service failed to start: {message}")
            }
            Self::NotRunning { .. } => "The search service is not running.".into(),
            Self::RequestFailure { message, .. } => message.clone(),
            Self::Http { source, .. } => source.to_string(),
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::SpawnFailure { .. } => {
                "The search service could not be found or launched. \
                   Reinstall the application or set launch.executable / launch.interpreter."
            }
            Self::HealthCheckTimeout { .. } => {
                "The search service is taking too long to start. \
                   Check the logs, then try starting it again."
            }
            Self::StartWaitTimeout { .. } => {
                "Another window is still starting the search service. Wait and retry."
            }
            Self::NotRunning { .. } => "Start the search service and retry the request.",
            Self::RequestFailure { .. } | Self::Http { .. } => {
                "The request did not complete. The service may have stopped; retry once it is running."
            }
            Self::StartAborted { .. } => {
                "The start attempt was abandoned. Check the logs, then start the service again."
            }
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        Self::Http {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
