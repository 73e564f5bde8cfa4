//! Translation of native window events and renderer signals into
//! controller events.

use docseek_desktop::window::host::{MAIN_WINDOW_LABEL, OVERLAY_READY_EVENT, OVERLAY_WINDOW_LABEL};
use docseek_desktop::window::{WindowEvent, WindowRole};

const MAIN_PAGE: &str = "index.html";
const OVERLAY_PAGE: &str = "overlay.html";

/// Page each window role loads from the bundled frontend.
pub fn page_for(role: WindowRole) -> &'static str {
    match role {
        WindowRole::Main => MAIN_PAGE,
        WindowRole::Overlay => OVERLAY_PAGE,
    }
}

/// Native lifecycle the controller cares about. Everything else is ignored.
pub fn classify(label: &str, event: &tauri::WindowEvent) -> Option<WindowEvent> {
    match (label, event) {
        (OVERLAY_WINDOW_LABEL, tauri::WindowEvent::Focused(false)) => {
            Some(WindowEvent::OverlayBlurred)
        }
        (OVERLAY_WINDOW_LABEL, tauri::WindowEvent::Destroyed) => Some(WindowEvent::OverlayClosed),
        (MAIN_WINDOW_LABEL, tauri::WindowEvent::Destroyed) => Some(WindowEvent::MainClosed),
        _ => None,
    }
}

pub fn renderer_signal(event: &str) -> Option<WindowEvent> {
    match event {
        OVERLAY_READY_EVENT => Some(WindowEvent::OverlayReady),
        _ => None,
    }
}
