//! Tauri shell around the docseek control plane.
//!
//! Supplies the webview window host and the global shortcut registrar,
//! feeds native window events to the controller and stops the service
//! before the process exits.

mod events;
mod hotkey;
mod host;
mod ipc;


use hotkey::TauriHotkeyRegistrar;
use host::TauriWindowHost;

use docseek_desktop::service::{HttpHealthProbe, TokioProcessLauncher};
use docseek_desktop::window::host::MAIN_WINDOW_LABEL;
use docseek_desktop::window::{EventOutcome, WindowEvent};
use docseek_desktop::{Collaborators, DesktopApp, bootstrap};

use std::sync::Arc;

use tauri::{AppHandle, ExitRequestApi, Manager, RunEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{error, info, warn};

pub fn run() -> tauri::Result<()> {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let native_events = events_tx.clone();

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            // Focus existing window on second instance attempt
            if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
                window.unminimize().ok();
                window.show().ok();
                window.set_focus().ok();
            }
        }))
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .setup(move |app| {
            let config = bootstrap()?;
            let handle = app.handle().clone();

            let probe = HttpHealthProbe::new(
                &config.service.base_url(),
                config.supervisor.probe_timeout(),
            )?;
            let collaborators = Collaborators {
                host: Arc::new(TauriWindowHost::new(handle.clone(), events_tx)),
                hotkeys: Arc::new(TauriHotkeyRegistrar::new(handle.clone())),
                launcher: Arc::new(TokioProcessLauncher),
                probe: Arc::new(probe),
            };

            let desktop =
                tauri::async_runtime::block_on(DesktopApp::setup(&config, collaborators))?;
            let desktop = Arc::new(desktop);
            app.manage(desktop.clone());

            #[cfg(unix)]
            spawn_signal_listener(handle.clone());

            tauri::async_runtime::spawn(pump_window_events(handle, desktop, events_rx));
            Ok(())
        })
        .on_window_event(move |window, event| {
            if let Some(event) = events::classify(window.label(), event)
                && native_events.send(event).is_err()
            {
                warn!("Event pump gone, dropping {event:?}");
            }
        })
        .invoke_handler(tauri::generate_handler![
            ipc::start_service,
            ipc::stop_service,
            ipc::service_status,
            ipc::forward_request,
            ipc::open_overlay,
            ipc::close_overlay,
            ipc::overlay_status,
            ipc::route_search,
        ])
        .build(tauri::generate_context!())?;

    app.run(|app_handle, event| {
        if let RunEvent::ExitRequested { api, code, .. } = event {
            on_exit_requested(app_handle, &api, code);
        }
    });
    Ok(())
}

/// Window events are handled one at a time, in arrival order.
async fn pump_window_events(
    app: AppHandle,
    desktop: Arc<DesktopApp>,
    mut events: UnboundedReceiver<WindowEvent>,
) {
    while let Some(event) = events.recv().await {
        match desktop.handle_event(event).await {
            Ok(EventOutcome::Continue) => {}
            Ok(EventOutcome::QuitRequested) => {
                info!("Quitting after {event:?}");
                app.exit(0);
                break;
            }
            Err(e) => warn!("Handling {event:?} failed: {e}"),
        }
    }
}

/// `code` is `None` when the last window closed on its own. Whether that
/// quits is the controller's call, which exits explicitly when it does.
fn on_exit_requested(app: &AppHandle, api: &ExitRequestApi, code: Option<i32>) {
    let Some(desktop) = app.try_state::<Arc<DesktopApp>>() else {
        return;
    };

    if code.is_none() {
        api.prevent_exit();
        return;
    }

    info!("Exit requested (code: {code:?})");
    if let Err(e) = tauri::async_runtime::block_on(desktop.shutdown()) {
        error!("Failed to stop service before exit: {e}");
    }
}

#[cfg(unix)]
fn spawn_signal_listener(app: AppHandle) {
    std::thread::spawn(move || {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;

        let mut signals = match Signals::new([SIGINT, SIGTERM]) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to register signal handlers: {e}");
                return;
            }
        };

        if let Some(sig) = signals.forever().next() {
            info!("Received signal {sig}, shutting down...");
            app.exit(0);
        }
    });
}
