use crate::window::WindowResult;

use docseek_config::WindowConfig;

pub const MACOS_DEFAULT_ACCELERATOR: &str = "Command+Shift+Space";
pub const DEFAULT_ACCELERATOR: &str = "Control+Shift+Space";

pub type HotkeyCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// The process-wide accelerator that toggles the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    accelerator: String,
}

impl HotkeyBinding {
    pub fn new(accelerator: impl Into<String>) -> Self {
        Self {
            accelerator: accelerator.into(),
        }
    }

    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new(MACOS_DEFAULT_ACCELERATOR)
        } else {
            Self::new(DEFAULT_ACCELERATOR)
        }
    }

    pub fn from_config(config: &WindowConfig) -> Self {
        config
            .hotkey
            .as_deref()
            .map(Self::new)
            .unwrap_or_else(Self::platform_default)
    }

    pub fn accelerator(&self) -> &str {
        &self.accelerator
    }
}

/// Global shortcut facility of the host OS.
///
/// Callbacks run on whatever thread the facility uses and must not block.
pub trait HotkeyRegistrar: Send + Sync {
    fn register(&self, binding: &HotkeyBinding, callback: HotkeyCallback) -> WindowResult<()>;

    fn unregister(&self, binding: &HotkeyBinding) -> WindowResult<()>;
}
