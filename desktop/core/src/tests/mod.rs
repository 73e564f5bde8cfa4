mod launch;
mod timeout_policy;

use crate::service::{
    HealthProbe, LaunchCommand, LaunchResolver, ProcessExit, ProcessLauncher, ServiceProcess,
    ServiceSupervisor,
};
use crate::window::{
    HotkeyBinding, HotkeyCallback, HotkeyRegistrar, ListenerId, WindowError,
    WindowHandle, WindowHost, WindowOptions, WindowResult,
};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docseek_config::SupervisorConfig;
use serde_json::Value;
use tokio::sync::watch;

pub(crate) const TEST_BASE_URL: &str = "http://127.0.0.1:8765";
pub(crate) const TEST_PORT: u16 = 8765;

// =========================================================================
// Process fakes
// =========================================================================

/// Counters shared by a launcher and every process it spawned.
#[derive(Default)]
pub(crate) struct ProcessLog {
    pub spawns: AtomicUsize,
    pub terminations: AtomicUsize,
    pub kills: AtomicUsize,
}

pub(crate) struct FakeProcess {
    pid: u32,
    exit_tx: Arc<watch::Sender<Option<ProcessExit>>>,
    exit_rx: watch::Receiver<Option<ProcessExit>>,
    exit_on_terminate: bool,
    log: Arc<ProcessLog>,
}

impl ServiceProcess for FakeProcess {
    fn pid(&self) -> Option<u32> {
        Some(self.pid)
    }

    fn terminate(&self) -> std::io::Result<()> {
        self.log.terminations.fetch_add(1, Ordering::SeqCst);
        if self.exit_on_terminate {
            let _ = self.exit_tx.send(Some(ProcessExit { code: Some(0) }));
        }
        Ok(())
    }

    fn kill(&self) -> std::io::Result<()> {
        self.log.kills.fetch_add(1, Ordering::SeqCst);
        let _ = self.exit_tx.send(Some(ProcessExit { code: None }));
        Ok(())
    }

    fn exit_watch(&self) -> watch::Receiver<Option<ProcessExit>> {
        self.exit_rx.clone()
    }
}

/// Hands out `FakeProcess`es and remembers how it was asked to launch.
pub(crate) struct FakeLauncher {
    pub log: Arc<ProcessLog>,
    fail: bool,
    exit_on_terminate: bool,
    exits: Mutex<Vec<Arc<watch::Sender<Option<ProcessExit>>>>>,
    commands: Mutex<Vec<LaunchCommand>>,
}

impl FakeLauncher {
    pub(crate) fn new() -> Arc<Self> {
        Self::build(false, true)
    }

    /// Every launch fails as if the executable were missing.
    pub(crate) fn failing() -> Arc<Self> {
        Self::build(true, true)
    }

    /// Processes ignore SIGTERM and only die when killed.
    pub(crate) fn stubborn() -> Arc<Self> {
        Self::build(false, false)
    }

    fn build(fail: bool, exit_on_terminate: bool) -> Arc<Self> {
        Arc::new(Self {
            log: Arc::new(ProcessLog::default()),
            fail,
            exit_on_terminate,
            exits: Mutex::new(Vec::new()),
            commands: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn spawn_count(&self) -> usize {
        self.log.spawns.load(Ordering::SeqCst)
    }

    pub(crate) fn termination_count(&self) -> usize {
        self.log.terminations.load(Ordering::SeqCst)
    }

    pub(crate) fn kill_count(&self) -> usize {
        self.log.kills.load(Ordering::SeqCst)
    }

    pub(crate) fn last_command(&self) -> Option<LaunchCommand> {
        self.commands.lock().unwrap().last().cloned()
    }

    /// Simulate the most recent child exiting on its own.
    pub(crate) fn exit_latest(&self, code: Option<i32>) {
        let exits = self.exits.lock().unwrap();
        let tx = exits.last().unwrap();
        tx.send(Some(ProcessExit { code })).unwrap();
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, command: &LaunchCommand) -> std::io::Result<Box<dyn ServiceProcess>> {
        self.commands.lock().unwrap().push(command.clone());

        if self.fail {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No such file or directory",
            ));
        }

        let count = self.log.spawns.fetch_add(1, Ordering::SeqCst) + 1;
        let (exit_tx, exit_rx) = watch::channel(None);
        let exit_tx = Arc::new(exit_tx);
        self.exits.lock().unwrap().push(exit_tx.clone());

        Ok(Box::new(FakeProcess {
            pid: 40_000 + count as u32,
            exit_tx,
            exit_rx,
            exit_on_terminate: self.exit_on_terminate,
            log: self.log.clone(),
        }))
    }
}

/// Health probe that fails a fixed number of times, then succeeds.
pub(crate) struct ScriptedProbe {
    failures: Option<u32>,
    calls: AtomicU32,
}

impl ScriptedProbe {
    pub(crate) fn healthy() -> Arc<Self> {
        Self::healthy_after(0)
    }

    pub(crate) fn healthy_after(failures: u32) -> Arc<Self> {
        Arc::new(Self {
            failures: Some(failures),
            calls: AtomicU32::new(0),
        })
    }

    pub(crate) fn never() -> Arc<Self> {
        Arc::new(Self {
            failures: None,
            calls: AtomicU32::new(0),
        })
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    async fn probe(&self) -> Result<(), String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.failures {
            Some(failures) if call > failures => Ok(()),
            _ => Err(String::from("connection refused")),
        }
    }
}

pub(crate) fn test_resolver() -> LaunchResolver {
    LaunchResolver::new("127.0.0.1", TEST_PORT, std::env::temp_dir())
        .with_executable(Some("/opt/docseek/docseek-service".into()))
}

pub(crate) fn supervisor_with(
    launcher: Arc<FakeLauncher>,
    probe: Arc<ScriptedProbe>,
) -> Arc<ServiceSupervisor> {
    supervisor_at(TEST_BASE_URL, launcher, probe)
}

pub(crate) fn supervisor_at(
    base_url: &str,
    launcher: Arc<FakeLauncher>,
    probe: Arc<ScriptedProbe>,
) -> Arc<ServiceSupervisor> {
    Arc::new(ServiceSupervisor::new(
        SupervisorConfig::default(),
        test_resolver(),
        base_url,
        launcher,
        probe,
    ))
}

// =========================================================================
// Window fakes
// =========================================================================

pub(crate) struct FakeWindow {
    label: String,
    destroyed: AtomicBool,
    calls: Mutex<Vec<String>>,
    emitted: Mutex<Vec<(String, Value)>>,
}

impl FakeWindow {
    fn new(label: &str) -> Self {
        Self {
            label: label.into(),
            destroyed: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            emitted: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: impl Into<String>) -> WindowResult<()> {
        if self.destroyed.load(Ordering::SeqCst) {
            return Err(WindowError::host("use window", "window destroyed"));
        }
        self.calls.lock().unwrap().push(call.into());
        Ok(())
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn emitted(&self) -> Vec<(String, Value)> {
        self.emitted.lock().unwrap().clone()
    }

    /// The user or the OS destroyed the window.
    pub(crate) fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }
}

impl WindowHandle for FakeWindow {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn show(&self) -> WindowResult<()> {
        self.record("show")
    }

    fn hide(&self) -> WindowResult<()> {
        self.record("hide")
    }

    fn focus(&self) -> WindowResult<()> {
        self.record("focus")
    }

    fn unminimize(&self) -> WindowResult<()> {
        self.record("unminimize")
    }

    fn raise_topmost(&self) -> WindowResult<()> {
        self.record("topmost")
    }

    fn close(&self) -> WindowResult<()> {
        self.record("close")?;
        self.destroy();
        Ok(())
    }

    fn emit(&self, event: &str, payload: Value) -> WindowResult<()> {
        self.record(format!("emit:{event}"))?;
        self.emitted.lock().unwrap().push((event.into(), payload));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeWindowHost {
    windows: Mutex<Vec<(WindowOptions, Arc<FakeWindow>)>>,
    listeners: Mutex<HashMap<ListenerId, String>>,
    next_listener: AtomicU64,
}

impl FakeWindowHost {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn created(&self, label: &str) -> usize {
        self.windows
            .lock()
            .unwrap()
            .iter()
            .filter(|(options, _)| options.label == label)
            .count()
    }

    pub(crate) fn latest(&self, label: &str) -> Option<(WindowOptions, Arc<FakeWindow>)> {
        self.windows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(options, _)| options.label == label)
            .cloned()
    }

    pub(crate) fn active_listeners(&self) -> Vec<String> {
        self.listeners.lock().unwrap().values().cloned().collect()
    }
}

impl WindowHost for FakeWindowHost {
    fn create(&self, options: &WindowOptions) -> WindowResult<Arc<dyn WindowHandle>> {
        let window = Arc::new(FakeWindow::new(options.label));
        self.windows
            .lock()
            .unwrap()
            .push((options.clone(), window.clone()));
        Ok(window)
    }

    fn listen_once(&self, window: &dyn WindowHandle, event: &str) -> WindowResult<ListenerId> {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::SeqCst));
        self.listeners
            .lock()
            .unwrap()
            .insert(id, format!("{}:{event}", window.label()));
        Ok(id)
    }

    fn unlisten(&self, listener: ListenerId) {
        self.listeners.lock().unwrap().remove(&listener);
    }
}

#[derive(Default)]
pub(crate) struct FakeHotkeyRegistrar {
    bindings: Mutex<HashMap<String, Arc<HotkeyCallback>>>,
    reject: bool,
}

impl FakeHotkeyRegistrar {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registration fails as if another app owned the accelerator.
    pub(crate) fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            reject: true,
            ..Self::default()
        })
    }

    pub(crate) fn registered(&self) -> Vec<String> {
        self.bindings.lock().unwrap().keys().cloned().collect()
    }

    /// Fire the callback the way the OS would. Returns false if unbound.
    pub(crate) fn press(&self, accelerator: &str) -> bool {
        let callback = self.bindings.lock().unwrap().get(accelerator).cloned();
        match callback {
            Some(callback) => {
                (*callback)();
                true
            }
            None => false,
        }
    }
}

impl HotkeyRegistrar for FakeHotkeyRegistrar {
    fn register(&self, binding: &HotkeyBinding, callback: HotkeyCallback) -> WindowResult<()> {
        let mut bindings = self.bindings.lock().unwrap();
        if self.reject || bindings.contains_key(binding.accelerator()) {
            return Err(WindowError::hotkey(
                binding.accelerator(),
                "registered",
                "already in use",
            ));
        }
        bindings.insert(binding.accelerator().into(), Arc::new(callback));
        Ok(())
    }

    fn unregister(&self, binding: &HotkeyBinding) -> WindowResult<()> {
        self.bindings
            .lock()
            .unwrap()
            .remove(binding.accelerator())
            .map(|_| ())
            .ok_or_else(|| {
                WindowError::hotkey(binding.accelerator(), "unregistered", "not registered")
            })
    }
}
