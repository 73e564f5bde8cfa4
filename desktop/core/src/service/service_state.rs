/// Current state of the search service process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceState {
    /// No process is held
    Stopped,
    /// A process was spawned and is being health-checked
    Starting,
    /// Process is up and answering /health
    Running { port: u16 },
    /// The last start attempt failed; always followed by Stopped
    Failed { error: String },
}

impl ServiceState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running { .. } => "running",
            Self::Failed { .. } => "failed",
        }
    }

    /// Failed counts as stopped when deciding whether to spawn again.
    pub fn accepts_start(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed { .. })
    }
}
