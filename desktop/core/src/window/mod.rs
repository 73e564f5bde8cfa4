mod controller;
mod error;
mod hotkey;
mod overlay_state;
mod window_event;

pub mod host;

pub use controller::WindowController;
pub use error::{Result as WindowResult, WindowError};
pub use hotkey::{
    DEFAULT_ACCELERATOR, HotkeyBinding, HotkeyCallback, HotkeyRegistrar,
    MACOS_DEFAULT_ACCELERATOR,
};
pub use host::{ListenerId, WindowHandle, WindowHost, WindowOptions, WindowRole};
pub use overlay_state::{OverlaySlot, OverlayWindowState};
pub use window_event::{EventOutcome, WindowEvent};
