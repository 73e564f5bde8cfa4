//! Main window and overlay orchestration.

use crate::service::ServiceSupervisor;
use crate::window::host::{OVERLAY_READY_EVENT, WindowHandle, WindowHost, WindowOptions};
use crate::window::{EventOutcome, OverlaySlot, OverlayWindowState, WindowEvent, WindowResult};

use std::sync::Arc;

use docseek_config::WindowConfig;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

type Window = Arc<dyn WindowHandle>;

pub struct WindowController {
    host: Arc<dyn WindowHost>,
    supervisor: Arc<ServiceSupervisor>,
    quit_on_all_closed: bool,
    main: Mutex<Option<Window>>,
    overlay: Mutex<OverlaySlot<Window>>,
}

impl WindowController {
    pub fn new(
        host: Arc<dyn WindowHost>,
        supervisor: Arc<ServiceSupervisor>,
        config: &WindowConfig,
    ) -> Self {
        // macOS apps keep running with no windows open
        let quit_on_all_closed = config
            .quit_on_all_closed
            .unwrap_or(!cfg!(target_os = "macos"));

        Self {
            host,
            supervisor,
            quit_on_all_closed,
            main: Mutex::new(None),
            overlay: Mutex::new(OverlaySlot::default()),
        }
    }

    pub fn quit_on_all_closed(&self) -> bool {
        self.quit_on_all_closed
    }

    /// Create the primary window unless a live one already exists.
    pub async fn ensure_main_window(&self) -> WindowResult<Window> {
        let mut main = self.main.lock().await;

        if let Some(window) = main.as_ref()
            && !window.is_destroyed()
        {
            return Ok(window.clone());
        }

        let window = self.host.create(&WindowOptions::main())?;
        info!("Created main window");
        *main = Some(window.clone());
        Ok(window)
    }

    pub async fn main_window(&self) -> Option<Window> {
        self.main
            .lock()
            .await
            .as_ref()
            .filter(|w| !w.is_destroyed())
            .cloned()
    }

    pub async fn overlay_state(&self) -> OverlayWindowState {
        self.overlay.lock().await.state()
    }

    /// Bring up the overlay, creating it on first use.
    ///
    /// A fresh overlay stays hidden until the renderer reports ready
    /// through `WindowEvent::OverlayReady`.
    pub async fn toggle_overlay(&self) -> WindowResult<OverlayWindowState> {
        let mut slot = self.overlay.lock().await;

        if slot.window().is_some_and(|w| w.is_destroyed()) {
            debug!("Overlay was destroyed behind our back, releasing it");
            self.release(&mut slot);
        }

        if let Some(window) = slot.window().cloned() {
            window.raise_topmost()?;
            if slot.state() == OverlayWindowState::ReadyHidden {
                window.show()?;
                slot.on_shown()?;
            }
            window.focus()?;
            debug!("Overlay refocused ({})", slot.state().label());
            return Ok(slot.state());
        }

        let window = self.host.create(&WindowOptions::overlay())?;
        let listener = match self.host.listen_once(window.as_ref(), OVERLAY_READY_EVENT) {
            Ok(listener) => listener,
            Err(e) => {
                if let Err(close_err) = window.close() {
                    warn!("Failed to close overlay after listener error: {close_err}");
                }
                return Err(e);
            }
        };

        slot.on_created(window, listener)?;
        info!("Created overlay, waiting for renderer");
        Ok(slot.state())
    }

    /// Destroy the overlay if it exists.
    pub async fn close_overlay(&self) -> WindowResult<()> {
        let mut slot = self.overlay.lock().await;
        if let Some(window) = self.release(&mut slot)
            && !window.is_destroyed()
        {
            window.close()?;
            info!("Overlay closed");
        }
        Ok(())
    }

    fn release(&self, slot: &mut OverlaySlot<Window>) -> Option<Window> {
        let (window, listener) = slot.on_closed();
        if let Some(listener) = listener {
            debug!("Dropping pending overlay ready listener");
            self.host.unlisten(listener);
        }
        window
    }

    pub async fn handle_event(&self, event: WindowEvent) -> WindowResult<EventOutcome> {
        debug!("Window event: {event:?}");

        match event {
            WindowEvent::OverlayReady => {
                let mut slot = self.overlay.lock().await;
                if slot.state() != OverlayWindowState::CreatedNotReady {
                    warn!("Overlay ready signal while {}", slot.state().label());
                    return Ok(EventOutcome::Continue);
                }

                let window = slot.on_ready()?.clone();
                window.raise_topmost()?;
                window.show()?;
                window.focus()?;
                slot.on_shown()?;
                Ok(EventOutcome::Continue)
            }
            WindowEvent::OverlayBlurred => {
                let mut slot = self.overlay.lock().await;
                if let Some(window) = slot.window().cloned()
                    && slot.state() == OverlayWindowState::Visible
                {
                    window.hide()?;
                    slot.on_blur()?;
                }
                Ok(EventOutcome::Continue)
            }
            WindowEvent::OverlayClosed => {
                self.release(&mut *self.overlay.lock().await);
                if self.main_window().await.is_none() {
                    return Ok(self.on_all_windows_closed().await);
                }
                Ok(EventOutcome::Continue)
            }
            WindowEvent::MainClosed => {
                self.main.lock().await.take();
                if self.overlay_state().await == OverlayWindowState::Absent {
                    return Ok(self.on_all_windows_closed().await);
                }
                Ok(EventOutcome::Continue)
            }
        }
    }

    /// Stop the service and ask the host to quit, unless this platform
    /// keeps apps alive without windows.
    pub async fn on_all_windows_closed(&self) -> EventOutcome {
        if !self.quit_on_all_closed {
            debug!("All windows closed, staying resident");
            return EventOutcome::Continue;
        }

        info!("All windows closed, shutting down");
        if let Err(e) = self.supervisor.stop().await {
            error!("Failed to stop service on exit: {e}");
        }
        EventOutcome::QuitRequested
    }
}
