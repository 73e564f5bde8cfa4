//! Control plane for the docseek search service.
//!
//! Supervises the external indexing/search process, forwards window
//! requests to it, and drives the main window plus the hotkey overlay.
//! The window toolkit and the global shortcut facility are reached through
//! [`window::WindowHost`] and [`window::HotkeyRegistrar`].

mod app;
mod error;

pub mod bus;
pub mod commands;
pub mod logging;
pub mod service;
pub mod window;

pub use app::{Collaborators, DesktopApp, ServiceStack, bootstrap};
pub use error::{AppError, Result as AppResult};

#[cfg(test)]
mod tests;
