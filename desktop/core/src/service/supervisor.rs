//! Search service process lifecycle.

use crate::service::{
    HealthProbe, LaunchResolver, ProcessExit, ProcessLauncher, ServiceError, ServiceProcess,
    ServiceResult, ServiceState, ServiceStatus, health,
};

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use docseek_config::SupervisorConfig;
use error_location::ErrorLocation;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

struct Inner {
    process: Option<Box<dyn ServiceProcess>>,
    /// Bumped for every spawn and every stop so stale exits and
    /// superseded start attempts can be told apart.
    generation: u64,
    running_since: Option<String>,
    last_error: Option<String>,
    recovery_hint: Option<&'static str>,
}

/// Headroom on top of the health budget for a joined start, covering
/// spawn and teardown of the owner's attempt.
const JOIN_GRACE: Duration = Duration::from_secs(5);

/// Owns the one search service process of this app.
///
/// Responsibilities:
/// - Spawn the service and wait for /health
/// - Collapse concurrent start requests into a single spawn
/// - Track unexpected exits (without restarting)
/// - Stop the service on request
///
/// State lives behind one mutex and every change is published on a
/// watch channel, which is also how concurrent `start()` callers learn
/// the outcome of the attempt they joined.
pub struct ServiceSupervisor {
    settings: SupervisorConfig,
    resolver: LaunchResolver,
    base_url: String,
    launcher: Arc<dyn ProcessLauncher>,
    probe: Arc<dyn HealthProbe>,
    inner: Arc<Mutex<Inner>>,
    state_tx: watch::Sender<ServiceState>,
    state_rx: watch::Receiver<ServiceState>,
}

impl ServiceSupervisor {
    pub fn new(
        settings: SupervisorConfig,
        resolver: LaunchResolver,
        base_url: impl Into<String>,
        launcher: Arc<dyn ProcessLauncher>,
        probe: Arc<dyn HealthProbe>,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(ServiceState::Stopped);

        Self {
            settings,
            resolver,
            base_url: base_url.into(),
            launcher,
            probe,
            inner: Arc::new(Mutex::new(Inner {
                process: None,
                generation: 0,
                running_since: None,
                last_error: None,
                recovery_hint: None,
            })),
            state_tx,
            state_rx,
        }
    }

    /// Start the service and wait until it answers /health.
    ///
    /// Already running is success. If another caller is mid-start this
    /// call waits for that attempt instead of spawning a second process.
    pub async fn start(&self) -> ServiceResult<()> {
        let owned_generation = {
            let mut inner = self.inner.lock().await;
            let state = self.state_rx.borrow().clone();

            match state {
                ServiceState::Running { .. } if inner.process.is_some() => {
                    debug!("Service already running, nothing to start");
                    return Ok(());
                }
                ServiceState::Starting => None,
                _ => {
                    if let Some(stale) = inner.process.take() {
                        warn!("Discarding stale service process {:?}", stale.pid());
                        if let Err(e) = stale.kill() {
                            warn!("Failed to kill stale service process: {e}");
                        }
                    }

                    inner.generation += 1;
                    inner.last_error = None;
                    inner.recovery_hint = None;
                    self.set_state(ServiceState::Starting);
                    Some(inner.generation)
                }
            }
        };

        match owned_generation {
            Some(generation) => self.run_start(generation).await,
            None => self.join_start().await,
        }
    }

    async fn run_start(&self, generation: u64) -> ServiceResult<()> {
        let command = match self.resolver.resolve() {
            Ok(command) => command,
            Err(e) => return Err(self.fail_start(generation, e).await),
        };

        info!(
            "Spawning service: {} {}",
            command.display_program(),
            command.args.join(" ")
        );

        let process = match self.launcher.launch(&command) {
            Ok(process) => process,
            Err(source) => {
                let e = ServiceError::spawn_failure(command.display_program(), source);
                return Err(self.fail_start(generation, e).await);
            }
        };

        info!("Spawned service with PID {:?}", process.pid());
        let exit_rx = process.exit_watch();
        let mut early_exit = exit_rx.clone();

        {
            let mut inner = self.inner.lock().await;
            if inner.generation != generation {
                // stop() ran while we were spawning
                drop(inner);
                if let Err(e) = process.terminate() {
                    warn!("Failed to signal superseded service process: {e}");
                }
                return Err(ServiceError::start_aborted("stopped while starting"));
            }
            inner.process = Some(process);
        }

        self.watch_exit(generation, exit_rx);

        let healthy = tokio::select! {
            result = health::wait_until_healthy(
                self.probe.as_ref(),
                self.settings.max_health_attempts,
            ) => result.map(|_| ()),
            Ok(exit) = early_exit.wait_for(Option::is_some) => {
                let code = (*exit).and_then(|exit| exit.code);
                Err(ServiceError::start_aborted(format!(
                    "service process exited with code {code:?} before becoming healthy"
                )))
            }
        };

        match healthy {
            Ok(()) => {
                let mut inner = self.inner.lock().await;
                if inner.generation != generation {
                    return Err(ServiceError::start_aborted("stopped while starting"));
                }
                if inner.process.is_none() {
                    drop(inner);
                    let e = ServiceError::start_aborted(
                        "service process exited before becoming healthy",
                    );
                    return Err(self.fail_start(generation, e).await);
                }

                inner.running_since = Some(chrono::Utc::now().to_rfc3339());
                self.set_state(ServiceState::Running {
                    port: self.resolver.port(),
                });
                info!("Service running at {}", self.base_url);
                Ok(())
            }
            Err(e) => {
                if self.inner.lock().await.generation != generation {
                    return Err(ServiceError::start_aborted("stopped while starting"));
                }
                Err(self.fail_start(generation, e).await)
            }
        }
    }

    /// Tear down a failed attempt and hand the error back.
    async fn fail_start(&self, generation: u64, err: ServiceError) -> ServiceError {
        error!("Service start failed: {err}");

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            return err;
        }

        if let Some(process) = inner.process.take()
            && let Err(e) = process.kill()
        {
            warn!("Failed to kill service process after failed start: {e}");
        }

        let message = err.user_message();
        inner.last_error = Some(message.clone());
        inner.recovery_hint = Some(err.recovery_hint());
        self.set_state(ServiceState::Failed { error: message });
        self.set_state(ServiceState::Stopped);

        err
    }

    /// Wait for somebody else's start attempt to finish.
    async fn join_start(&self) -> ServiceResult<()> {
        debug!("Service start already in progress, waiting");

        let wait = self.settings.start_wait().unwrap_or_else(|| {
            health::startup_budget(
                self.settings.max_health_attempts,
                self.settings.probe_timeout(),
            ) + JOIN_GRACE
        });
        let finished = {
            let mut rx = self.state_rx.clone();
            let outcome = tokio::time::timeout(
                wait,
                rx.wait_for(|state| !matches!(state, ServiceState::Starting)),
            )
            .await;

            match outcome {
                Ok(Ok(state)) => state.clone(),
                Ok(Err(_)) => {
                    return Err(ServiceError::start_aborted("state channel closed"));
                }
                Err(_) => {
                    return Err(ServiceError::StartWaitTimeout {
                        waited_secs: wait.as_secs(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }
        };

        match finished {
            ServiceState::Running { .. } => Ok(()),
            ServiceState::Failed { error } => Err(ServiceError::start_aborted(error)),
            _ => {
                let message = self
                    .inner
                    .lock()
                    .await
                    .last_error
                    .clone()
                    .unwrap_or_else(|| String::from("start attempt did not complete"));
                Err(ServiceError::start_aborted(message))
            }
        }
    }

    /// Apply the exit of a spawned process to the supervisor state.
    fn watch_exit(&self, generation: u64, mut exit_rx: watch::Receiver<Option<ProcessExit>>) {
        let inner = self.inner.clone();
        let state_tx = self.state_tx.clone();

        tokio::spawn(async move {
            let exit = match exit_rx.wait_for(Option::is_some).await {
                Ok(exit) => *exit,
                Err(_) => None,
            };

            let mut inner = inner.lock().await;
            if inner.generation != generation || inner.process.is_none() {
                debug!("Ignoring exit of superseded service process: {exit:?}");
                return;
            }

            inner.process = None;
            inner.running_since = None;
            let code = exit.and_then(|e| e.code);

            let was_running = matches!(*state_tx.borrow(), ServiceState::Running { .. });
            if was_running {
                warn!("Service process exited unexpectedly (code {code:?})");
                inner.last_error = Some(format!("Service exited with code {code:?}"));
                inner.recovery_hint = None;
                let _ = state_tx.send(ServiceState::Stopped);
            } else {
                warn!("Service process exited during startup (code {code:?})");
                inner.last_error =
                    Some(format!("Service exited with code {code:?} during startup"));
            }
        });
    }

    /// Stop the service gracefully.
    ///
    /// No process held means nothing to do. A failed signal is logged,
    /// not returned.
    pub async fn stop(&self) -> ServiceResult<()> {
        let process = {
            let mut inner = self.inner.lock().await;
            let Some(process) = inner.process.take() else {
                debug!("Stop requested but no service process is held");
                return Ok(());
            };
            inner.generation += 1;
            inner.running_since = None;
            self.set_state(ServiceState::Stopped);
            process
        };

        info!("Stopping service (PID {:?})", process.pid());
        if let Err(e) = process.terminate() {
            error!("Failed to signal service process: {e}");
        }

        self.escalate_after_grace(process);
        info!("Service stopped");

        Ok(())
    }

    /// Force-kill the process if it ignores the graceful signal.
    fn escalate_after_grace(&self, process: Box<dyn ServiceProcess>) {
        let grace = self.settings.shutdown_timeout();
        let mut exit_rx = process.exit_watch();

        tokio::spawn(async move {
            let exited = tokio::time::timeout(grace, exit_rx.wait_for(Option::is_some)).await;
            if exited.is_err() {
                warn!(
                    "Service process {:?} still alive after {}s, killing",
                    process.pid(),
                    grace.as_secs()
                );
                if let Err(e) = process.kill() {
                    error!("Failed to kill service process: {e}");
                }
            }
        });
    }

    /// True iff the state is Running and a process handle is held.
    pub async fn is_running(&self) -> bool {
        let inner = self.inner.lock().await;
        let running = matches!(*self.state_rx.borrow(), ServiceState::Running { .. });
        running && inner.process.is_some()
    }

    fn set_state(&self, state: ServiceState) {
        let _ = self.state_tx.send(state);
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ServiceState> {
        self.state_rx.clone()
    }

    pub fn state(&self) -> ServiceState {
        self.state_rx.borrow().clone()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn pid(&self) -> Option<u32> {
        self.inner
            .lock()
            .await
            .process
            .as_ref()
            .and_then(|p| p.pid())
    }

    pub async fn status(&self) -> ServiceStatus {
        let inner = self.inner.lock().await;
        let state = self.state_rx.borrow().clone();
        let pid = inner.process.as_ref().and_then(|p| p.pid());

        ServiceStatus::build(
            &state,
            &self.base_url,
            pid,
            inner.process.is_some(),
            inner.running_since.as_deref(),
            inner.last_error.as_deref(),
            inner.recovery_hint,
        )
    }
}
