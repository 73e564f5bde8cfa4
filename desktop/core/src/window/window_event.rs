/// Lifecycle notifications the window host forwards to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The overlay renderer sent its one-shot ready signal.
    OverlayReady,
    OverlayBlurred,
    /// The overlay was destroyed by the user or the OS.
    OverlayClosed,
    MainClosed,
}

/// What the host should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Continue,
    QuitRequested,
}
