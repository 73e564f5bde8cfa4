//! Child process handles for the search service.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Fully resolved invocation of the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
    pub env: Vec<(String, String)>,
}

impl LaunchCommand {
    pub fn display_program(&self) -> String {
        self.program.display().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    pub code: Option<i32>,
}

/// A spawned service process.
///
/// Only the supervisor holds one of these. Exit is observed through
/// `exit_watch`, which flips from `None` to `Some` exactly once.
pub trait ServiceProcess: Send + Sync {
    fn pid(&self) -> Option<u32>;

    /// Ask the process to shut down (SIGTERM on unix).
    fn terminate(&self) -> std::io::Result<()>;

    /// Force the process down.
    fn kill(&self) -> std::io::Result<()>;

    fn exit_watch(&self) -> watch::Receiver<Option<ProcessExit>>;
}

pub trait ProcessLauncher: Send + Sync {
    fn launch(&self, command: &LaunchCommand) -> std::io::Result<Box<dyn ServiceProcess>>;
}

/// Launches the service with `tokio::process`.
///
/// The child's stdout/stderr are forwarded line by line into tracing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessLauncher;

impl ProcessLauncher for TokioProcessLauncher {
    fn launch(&self, command: &LaunchCommand) -> std::io::Result<Box<dyn ServiceProcess>> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .current_dir(&command.current_dir)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn()?;
        let pid = child.id();

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_output(stdout, "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_output(stderr, "stderr"));
        }

        let (exit_tx, exit_rx) = watch::channel(None);
        tokio::spawn(async move {
            let code = match child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    warn!("Failed to wait on service process: {e}");
                    None
                }
            };
            info!("Service process {pid:?} exited with code {code:?}");
            let _ = exit_tx.send(Some(ProcessExit { code }));
        });

        Ok(Box::new(TokioServiceProcess { pid, exit_rx }))
    }
}

async fn forward_output<R: AsyncRead + Unpin>(stream: R, channel: &'static str) {
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        debug!(target: "docseek_service", channel, "{line}");
    }
}

struct TokioServiceProcess {
    pid: Option<u32>,
    exit_rx: watch::Receiver<Option<ProcessExit>>,
}

impl TokioServiceProcess {
    fn live_pid(&self) -> Option<u32> {
        // Never signal a pid that may already have been recycled.
        if self.exit_rx.borrow().is_some() {
            None
        } else {
            self.pid
        }
    }
}

impl ServiceProcess for TokioServiceProcess {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn terminate(&self) -> std::io::Result<()> {
        let Some(pid) = self.live_pid() else {
            return Ok(());
        };

        #[cfg(unix)]
        {
            use nix::sys::signal::{Signal, kill};
            use nix::unistd::Pid;

            info!("Sending SIGTERM to pid {pid}");
            kill(Pid::from_raw(pid as i32), Signal::SIGTERM).map_err(std::io::Error::from)
        }

        #[cfg(windows)]
        {
            info!("Requesting taskkill for pid {pid}");
            std::process::Command::new("taskkill")
                .args(["/PID", &pid.to_string()])
                .output()
                .map(|_| ())
        }
    }

    fn kill(&self) -> std::io::Result<()> {
        let Some(pid) = self.live_pid() else {
            return Ok(());
        };

        #[cfg(unix)]
        {
            use nix::sys::signal::{Signal, kill};
            use nix::unistd::Pid;

            info!("Sending SIGKILL to pid {pid}");
            kill(Pid::from_raw(pid as i32), Signal::SIGKILL).map_err(std::io::Error::from)
        }

        #[cfg(windows)]
        {
            info!("Force killing pid {pid}");
            std::process::Command::new("taskkill")
                .args(["/F", "/PID", &pid.to_string()])
                .output()
                .map(|_| ())
        }
    }

    fn exit_watch(&self) -> watch::Receiver<Option<ProcessExit>> {
        self.exit_rx.clone()
    }
}
