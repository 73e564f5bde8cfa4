use crate::window::host::ListenerId;
use crate::window::{WindowError, WindowResult};

use serde::Serialize;

/// Externally visible overlay lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayWindowState {
    Absent,
    CreatedNotReady,
    ReadyHidden,
    Visible,
}

impl OverlayWindowState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::CreatedNotReady => "created_not_ready",
            Self::ReadyHidden => "ready_hidden",
            Self::Visible => "visible",
        }
    }
}

enum Slot<W> {
    Absent,
    CreatedNotReady { window: W, listener: ListenerId },
    ReadyHidden { window: W },
    Visible { window: W },
}

/// The singleton overlay and its lifecycle.
///
/// A window handle exists only in the non-absent states, so there is no
/// way to show or hide a window that was never created or already closed.
pub struct OverlaySlot<W> {
    slot: Slot<W>,
}

impl<W> Default for OverlaySlot<W> {
    fn default() -> Self {
        Self { slot: Slot::Absent }
    }
}

impl<W> OverlaySlot<W> {
    pub fn state(&self) -> OverlayWindowState {
        match self.slot {
            Slot::Absent => OverlayWindowState::Absent,
            Slot::CreatedNotReady { .. } => OverlayWindowState::CreatedNotReady,
            Slot::ReadyHidden { .. } => OverlayWindowState::ReadyHidden,
            Slot::Visible { .. } => OverlayWindowState::Visible,
        }
    }

    pub fn window(&self) -> Option<&W> {
        match &self.slot {
            Slot::Absent => None,
            Slot::CreatedNotReady { window, .. }
            | Slot::ReadyHidden { window }
            | Slot::Visible { window } => Some(window),
        }
    }

    pub fn on_created(&mut self, window: W, listener: ListenerId) -> WindowResult<()> {
        if !matches!(self.slot, Slot::Absent) {
            return Err(WindowError::illegal("be created", self.state().label()));
        }
        self.slot = Slot::CreatedNotReady { window, listener };
        Ok(())
    }

    pub fn on_ready(&mut self) -> WindowResult<&W> {
        match std::mem::replace(&mut self.slot, Slot::Absent) {
            Slot::CreatedNotReady { window, .. } => {
                self.slot = Slot::ReadyHidden { window };
            }
            other => {
                self.slot = other;
                return Err(WindowError::illegal("become ready", self.state().label()));
            }
        }
        self.window()
            .ok_or_else(|| WindowError::illegal("become ready", "absent"))
    }

    pub fn on_shown(&mut self) -> WindowResult<()> {
        match std::mem::replace(&mut self.slot, Slot::Absent) {
            Slot::ReadyHidden { window } | Slot::Visible { window } => {
                self.slot = Slot::Visible { window };
                Ok(())
            }
            other => {
                self.slot = other;
                Err(WindowError::illegal("be shown", self.state().label()))
            }
        }
    }

    pub fn on_blur(&mut self) -> WindowResult<()> {
        match std::mem::replace(&mut self.slot, Slot::Absent) {
            Slot::Visible { window } => {
                self.slot = Slot::ReadyHidden { window };
                Ok(())
            }
            other => {
                self.slot = other;
                Err(WindowError::illegal("be hidden", self.state().label()))
            }
        }
    }

    /// Close is legal from every state. Returns the window and, if the
    /// renderer never signalled ready, the listener that is still pending.
    pub fn on_closed(&mut self) -> (Option<W>, Option<ListenerId>) {
        match std::mem::replace(&mut self.slot, Slot::Absent) {
            Slot::Absent => (None, None),
            Slot::CreatedNotReady { window, listener } => (Some(window), Some(listener)),
            Slot::ReadyHidden { window } | Slot::Visible { window } => (Some(window), None),
        }
    }
}
