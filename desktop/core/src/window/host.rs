//! Seam between the controller and the actual window toolkit.

use crate::window::WindowResult;

use std::sync::Arc;

use serde_json::Value;

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const OVERLAY_WINDOW_LABEL: &str = "overlay";

/// Renderer -> host event announcing the overlay finished its first paint.
pub const OVERLAY_READY_EVENT: &str = "overlay-ready";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowRole {
    Main,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct WindowOptions {
    pub role: WindowRole,
    pub label: &'static str,
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub decorations: bool,
    pub resizable: bool,
    pub always_on_top: bool,
    pub visible: bool,
    pub skip_taskbar: bool,
}

impl WindowOptions {
    pub fn main() -> Self {
        Self {
            role: WindowRole::Main,
            label: MAIN_WINDOW_LABEL,
            title: String::from("docseek"),
            width: 1200.0,
            height: 800.0,
            decorations: true,
            resizable: true,
            always_on_top: false,
            visible: true,
            skip_taskbar: false,
        }
    }

    /// Frameless, fixed size, always on top and hidden until ready.
    pub fn overlay() -> Self {
        Self {
            role: WindowRole::Overlay,
            label: OVERLAY_WINDOW_LABEL,
            title: String::from("docseek search"),
            width: 720.0,
            height: 420.0,
            decorations: false,
            resizable: false,
            always_on_top: true,
            visible: false,
            skip_taskbar: true,
        }
    }
}

/// A live native window.
pub trait WindowHandle: Send + Sync {
    fn label(&self) -> &str;
    fn is_destroyed(&self) -> bool;
    fn show(&self) -> WindowResult<()>;
    fn hide(&self) -> WindowResult<()>;
    fn focus(&self) -> WindowResult<()>;
    fn unminimize(&self) -> WindowResult<()>;
    /// Stack above everything, fullscreen apps and other always-on-top
    /// surfaces included.
    fn raise_topmost(&self) -> WindowResult<()>;
    fn close(&self) -> WindowResult<()>;
    fn emit(&self, event: &str, payload: Value) -> WindowResult<()>;
}

/// Creates windows and wires renderer events.
///
/// Hosts report window lifecycle back through
/// `WindowController::handle_event`.
pub trait WindowHost: Send + Sync {
    fn create(&self, options: &WindowOptions) -> WindowResult<Arc<dyn WindowHandle>>;

    /// Register a listener that fires once for `event` from `window`.
    fn listen_once(&self, window: &dyn WindowHandle, event: &str) -> WindowResult<ListenerId>;

    fn unlisten(&self, listener: ListenerId);
}
