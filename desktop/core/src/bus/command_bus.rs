//! In-process routing between window contexts.

use crate::bus::SearchRequest;
use crate::window::{WindowController, WindowError, WindowResult};

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Event the main window receives with a routed query.
pub const PERFORM_SEARCH_EVENT: &str = "perform-search";

const BUS_CAPACITY: usize = 32;

#[derive(Debug)]
pub enum BusCommand {
    ToggleOverlay,
    PerformSearch {
        request: SearchRequest,
        reply: oneshot::Sender<WindowResult<()>>,
    },
}

/// Deliver a search to the main window.
///
/// Fails with `NoTargetWindow` instead of dropping the request when there
/// is no main window.
pub async fn route_search(
    controller: &WindowController,
    request: &SearchRequest,
) -> WindowResult<()> {
    let Some(window) = controller.main_window().await else {
        warn!("No main window for search {:?}", request.query);
        return Err(WindowError::no_target_window());
    };

    let payload = serde_json::to_value(request)
        .map_err(|e| WindowError::host("serialize search request", e.to_string()))?;

    window.unminimize()?;
    window.show()?;
    window.focus()?;
    window.emit(PERFORM_SEARCH_EVENT, payload)?;

    info!(
        "Routed {:?} search to main window ({:?})",
        request.mode, request.presentation
    );
    Ok(())
}

/// Owner of the command channel. Consumed by `run`.
pub struct CommandBus {
    controller: Arc<WindowController>,
    tx: mpsc::Sender<BusCommand>,
    rx: mpsc::Receiver<BusCommand>,
}

impl CommandBus {
    pub fn new(controller: Arc<WindowController>) -> Self {
        let (tx, rx) = mpsc::channel(BUS_CAPACITY);
        Self { controller, tx, rx }
    }

    pub fn handle(&self) -> BusHandle {
        BusHandle {
            tx: self.tx.clone(),
        }
    }

    /// Process commands until every `BusHandle` is dropped.
    pub async fn run(self) {
        let Self {
            controller,
            tx,
            mut rx,
        } = self;
        drop(tx);

        while let Some(command) = rx.recv().await {
            match command {
                BusCommand::ToggleOverlay => {
                    if let Err(e) = controller.toggle_overlay().await {
                        error!("Failed to toggle overlay: {e}");
                    }
                }
                BusCommand::PerformSearch { request, reply } => {
                    let result = route_search(&controller, &request).await;
                    if reply.send(result).is_err() {
                        debug!("Search requester went away before the reply");
                    }
                }
            }
        }

        debug!("Command bus drained");
    }
}

/// Cheap, cloneable sender side of the bus.
#[derive(Clone)]
pub struct BusHandle {
    tx: mpsc::Sender<BusCommand>,
}

impl BusHandle {
    /// Non-blocking; safe to call from a hotkey callback thread.
    pub fn toggle_overlay(&self) -> WindowResult<()> {
        match self.tx.try_send(BusCommand::ToggleOverlay) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Command bus full, dropping overlay toggle");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(WindowError::bus_closed()),
        }
    }

    pub async fn perform_search(&self, request: SearchRequest) -> WindowResult<()> {
        let (reply, reply_rx) = oneshot::channel();
        self.tx
            .send(BusCommand::PerformSearch { request, reply })
            .await
            .map_err(|_| WindowError::bus_closed())?;

        reply_rx.await.map_err(|_| WindowError::bus_closed())?
    }
}
