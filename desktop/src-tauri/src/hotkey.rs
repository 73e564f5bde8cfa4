use docseek_desktop::window::{
    HotkeyBinding, HotkeyCallback, HotkeyRegistrar, WindowError, WindowResult,
};

use tauri::AppHandle;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};

/// OS-wide shortcuts through the global shortcut plugin.
pub struct TauriHotkeyRegistrar {
    app: AppHandle,
}

impl TauriHotkeyRegistrar {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl HotkeyRegistrar for TauriHotkeyRegistrar {
    fn register(&self, binding: &HotkeyBinding, callback: HotkeyCallback) -> WindowResult<()> {
        self.app
            .global_shortcut()
            .on_shortcut(binding.accelerator(), move |_app, _shortcut, event| {
                if event.state == ShortcutState::Pressed {
                    callback();
                }
            })
            .map_err(|e| WindowError::hotkey(binding.accelerator(), "register", e.to_string()))
    }

    fn unregister(&self, binding: &HotkeyBinding) -> WindowResult<()> {
        self.app
            .global_shortcut()
            .unregister(binding.accelerator())
            .map_err(|e| WindowError::hotkey(binding.accelerator(), "unregister", e.to_string()))
    }
}
