use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("Window host failed to {operation}: {message} {location}")]
    HostFailure {
        operation: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("No main window to deliver to {location}")]
    NoTargetWindow { location: ErrorLocation },

    #[error("Overlay cannot {action} while {state} {location}")]
    IllegalTransition {
        action: &'static str,
        state: &'static str,
        location: ErrorLocation,
    },

    #[error("Hotkey {accelerator} could not be {operation}: {message} {location}")]
    Hotkey {
        accelerator: String,
        operation: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("Command bus is closed {location}")]
    BusClosed { location: ErrorLocation },
}

impl WindowError {
    #[track_caller]
    pub fn host(operation: &'static str, message: impl Into<String>) -> Self {
        Self::HostFailure {
            operation,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn no_target_window() -> Self {
        Self::NoTargetWindow {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn illegal(action: &'static str, state: &'static str) -> Self {
        Self::IllegalTransition {
            action,
            state,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn hotkey(
        accelerator: impl Into<String>,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::Hotkey {
            accelerator: accelerator.into(),
            operation,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn bus_closed() -> Self {
        Self::BusClosed {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WindowError>;
