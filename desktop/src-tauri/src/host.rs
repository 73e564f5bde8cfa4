//! Webview windows backing the controller.

use crate::events::{page_for, renderer_signal};

use docseek_desktop::window::{
    ListenerId, WindowError, WindowEvent, WindowHandle, WindowHost, WindowOptions, WindowResult,
};

use std::sync::Arc;

use serde_json::Value;
use tauri::{
    AppHandle, Emitter, EventId, Listener, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

pub struct TauriWindowHost {
    app: AppHandle,
    events: UnboundedSender<WindowEvent>,
}

impl TauriWindowHost {
    /// Renderer signals are delivered on `events`, next to the native
    /// window events.
    pub fn new(app: AppHandle, events: UnboundedSender<WindowEvent>) -> Self {
        Self { app, events }
    }
}

impl WindowHost for TauriWindowHost {
    fn create(&self, options: &WindowOptions) -> WindowResult<Arc<dyn WindowHandle>> {
        let page = page_for(options.role);
        debug!("Creating window {} ({page})", options.label);

        let url = WebviewUrl::App(page.into());
        let window = WebviewWindowBuilder::new(&self.app, options.label, url)
            .title(&options.title)
            .inner_size(options.width, options.height)
            .decorations(options.decorations)
            .resizable(options.resizable)
            .always_on_top(options.always_on_top)
            .visible(options.visible)
            .skip_taskbar(options.skip_taskbar)
            .center()
            .build()
            .map_err(|e| WindowError::host("create window", e.to_string()))?;

        Ok(Arc::new(TauriWindow { window }))
    }

    fn listen_once(&self, window: &dyn WindowHandle, event: &str) -> WindowResult<ListenerId> {
        let Some(signal) = renderer_signal(event) else {
            return Err(WindowError::host(
                "listen",
                format!("{event:?} is not a renderer signal"),
            ));
        };

        let events = self.events.clone();
        let label = window.label().to_string();
        let id = self.app.once(event, move |_| {
            if events.send(signal).is_err() {
                warn!("Event pump gone, dropping {signal:?} from {label}");
            }
        });
        Ok(ListenerId(u64::from(id)))
    }

    fn unlisten(&self, listener: ListenerId) {
        match EventId::try_from(listener.0) {
            Ok(id) => self.app.unlisten(id),
            Err(_) => warn!("Listener id {} was not issued by this host", listener.0),
        }
    }
}

pub struct TauriWindow {
    window: WebviewWindow,
}

fn host_error(operation: &'static str) -> impl FnOnce(tauri::Error) -> WindowError {
    move |e| WindowError::host(operation, e.to_string())
}

impl WindowHandle for TauriWindow {
    fn label(&self) -> &str {
        self.window.label()
    }

    fn is_destroyed(&self) -> bool {
        self.window
            .app_handle()
            .get_webview_window(self.window.label())
            .is_none()
    }

    fn show(&self) -> WindowResult<()> {
        self.window.show().map_err(host_error("show"))
    }

    fn hide(&self) -> WindowResult<()> {
        self.window.hide().map_err(host_error("hide"))
    }

    fn focus(&self) -> WindowResult<()> {
        self.window.set_focus().map_err(host_error("focus"))
    }

    fn unminimize(&self) -> WindowResult<()> {
        self.window.unminimize().map_err(host_error("unminimize"))
    }

    fn raise_topmost(&self) -> WindowResult<()> {
        self.window
            .set_always_on_top(true)
            .map_err(host_error("always on top"))?;
        self.window
            .set_visible_on_all_workspaces(true)
            .map_err(host_error("all workspaces"))
    }

    fn close(&self) -> WindowResult<()> {
        self.window.close().map_err(host_error("close"))
    }

    fn emit(&self, event: &str, payload: Value) -> WindowResult<()> {
        self.window
            .emit_to(self.window.label(), event, payload)
            .map_err(host_error("emit"))
    }
}
