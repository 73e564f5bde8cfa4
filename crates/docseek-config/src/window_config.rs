use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Accelerator for the overlay, e.g. "Control+Shift+Space".
    /// Unset means the platform default.
    pub hotkey: Option<String>,
    /// Quit once the last window closes. Unset means "everywhere but macOS".
    pub quit_on_all_closed: Option<bool>,
}

impl WindowConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(hotkey) = &self.hotkey
            && hotkey.split('+').any(|part| part.trim().is_empty())
        {
            return Err(ConfigError::window(format!(
                "window.hotkey is not a valid accelerator: {hotkey:?}"
            )));
        }

        Ok(())
    }
}
