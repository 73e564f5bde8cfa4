//! Wiring of supervisor, router, windows, bus and hotkey.

use crate::bus::{BusHandle, CommandBus};
use crate::logging::setup_logging;
use crate::service::{
    HealthProbe, HttpHealthProbe, LaunchResolver, ProcessLauncher, RequestRouter,
    ServiceSupervisor, TimeoutPolicy, TokioProcessLauncher,
};
use crate::window::{
    EventOutcome, HotkeyBinding, HotkeyRegistrar, WindowController, WindowEvent, WindowHost,
    WindowResult,
};
use crate::{AppError, AppResult};

use std::sync::Arc;

use docseek_config::Config;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Load and validate config, then bring up logging.
///
/// Every entry point calls this first.
pub fn bootstrap() -> AppResult<Config> {
    let config = Config::load()?;
    config.validate()?;

    let log_dir = config.log_dir()?;
    setup_logging(&log_dir, &config.logging).map_err(|e| AppError::logging(e.to_string()))?;

    info!("Starting docseek v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();
    Ok(config)
}

/// Supervisor plus router for one configured service.
pub struct ServiceStack {
    pub supervisor: Arc<ServiceSupervisor>,
    pub router: Arc<RequestRouter>,
}

impl ServiceStack {
    pub fn build(
        config: &Config,
        launcher: Arc<dyn ProcessLauncher>,
        probe: Arc<dyn HealthProbe>,
    ) -> AppResult<Self> {
        let base_url = config.service.base_url();
        let resolver = LaunchResolver::from_config(config, config.service_dir()?);

        let supervisor = Arc::new(ServiceSupervisor::new(
            config.supervisor.clone(),
            resolver,
            base_url.clone(),
            launcher,
            probe,
        ));

        let router = Arc::new(RequestRouter::new(
            supervisor.clone(),
            &base_url,
            TimeoutPolicy::from_config(&config.timeouts),
        )?);

        Ok(Self { supervisor, router })
    }

    /// Real child processes and HTTP health probes.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let probe = HttpHealthProbe::new(
            &config.service.base_url(),
            config.supervisor.probe_timeout(),
        )?;
        Self::build(config, Arc::new(TokioProcessLauncher), Arc::new(probe))
    }
}

/// Platform pieces supplied by the embedding shell.
pub struct Collaborators {
    pub host: Arc<dyn WindowHost>,
    pub hotkeys: Arc<dyn HotkeyRegistrar>,
    pub launcher: Arc<dyn ProcessLauncher>,
    pub probe: Arc<dyn HealthProbe>,
}

pub struct DesktopApp {
    supervisor: Arc<ServiceSupervisor>,
    router: Arc<RequestRouter>,
    controller: Arc<WindowController>,
    bus: BusHandle,
    bus_task: JoinHandle<()>,
    hotkeys: Arc<dyn HotkeyRegistrar>,
    hotkey: HotkeyBinding,
}

impl DesktopApp {
    /// Build every component, open the main window, register the hotkey
    /// and kick off the service if `service.auto_start` is set.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn setup(config: &Config, collaborators: Collaborators) -> AppResult<Self> {
        let Collaborators {
            host,
            hotkeys,
            launcher,
            probe,
        } = collaborators;

        let ServiceStack { supervisor, router } = ServiceStack::build(config, launcher, probe)?;
        let controller = Arc::new(WindowController::new(
            host,
            supervisor.clone(),
            &config.window,
        ));
        controller.ensure_main_window().await?;

        let bus = CommandBus::new(controller.clone());
        let handle = bus.handle();
        let bus_task = tokio::spawn(bus.run());

        let hotkey = HotkeyBinding::from_config(&config.window);
        let toggle = handle.clone();
        let registered = hotkeys.register(
            &hotkey,
            Box::new(move || {
                if let Err(e) = toggle.toggle_overlay() {
                    warn!("Hotkey could not reach the command bus: {e}");
                }
            }),
        );
        if let Err(e) = registered {
            bus_task.abort();
            return Err(e.into());
        }
        info!("Registered overlay hotkey {}", hotkey.accelerator());

        if config.service.auto_start {
            let supervisor = supervisor.clone();
            tokio::spawn(async move {
                if let Err(e) = supervisor.start().await {
                    error!("Auto-start failed: {e}");
                }
            });
        }

        Ok(Self {
            supervisor,
            router,
            controller,
            bus: handle,
            bus_task,
            hotkeys,
            hotkey,
        })
    }

    pub fn supervisor(&self) -> &Arc<ServiceSupervisor> {
        &self.supervisor
    }

    pub fn router(&self) -> &Arc<RequestRouter> {
        &self.router
    }

    pub fn controller(&self) -> &Arc<WindowController> {
        &self.controller
    }

    pub fn bus(&self) -> &BusHandle {
        &self.bus
    }

    pub fn hotkey(&self) -> &HotkeyBinding {
        &self.hotkey
    }

    /// Host windows report lifecycle here.
    pub async fn handle_event(&self, event: WindowEvent) -> WindowResult<EventOutcome> {
        self.controller.handle_event(event).await
    }

    /// Release the hotkey and stop the service.
    ///
    /// Continues past a failed unregister so the child is never orphaned.
    pub async fn shutdown(&self) -> AppResult<()> {
        info!("Shutting down");

        if let Err(e) = self.hotkeys.unregister(&self.hotkey) {
            error!("Failed to unregister hotkey: {e}");
        }

        self.supervisor.stop().await?;
        self.bus_task.abort();
        Ok(())
    }
}
