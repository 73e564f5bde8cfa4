//! Command surface exposed to windows.
//!
//! Errors cross this boundary as display strings: the short user message
//! for service start/stop, the underlying message for forwarded requests.

use crate::bus::{BusHandle, SearchRequest};
use crate::service::{RequestRouter, RequestSpec, ServiceStatus, ServiceSupervisor};
use crate::window::{OverlayWindowState, WindowController};

use reqwest::Method;
use serde_json::Value;
use tracing::{error, info};

/// Start the service (or join a start in progress) and report status.
pub async fn start_service(supervisor: &ServiceSupervisor) -> Result<ServiceStatus, String> {
    supervisor.start().await.map_err(|e| {
        error!("start_service failed: {e}");
        e.user_message()
    })?;
    Ok(supervisor.status().await)
}

pub async fn stop_service(supervisor: &ServiceSupervisor) -> Result<(), String> {
    supervisor.stop().await.map_err(|e| e.user_message())
}

pub async fn service_status(supervisor: &ServiceSupervisor) -> Result<ServiceStatus, String> {
    Ok(supervisor.status().await)
}

/// Generic passthrough to the service.
pub async fn forward_request(
    router: &RequestRouter,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> Result<Value, String> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|e| format!("Invalid HTTP method {method:?}: {e}"))?;

    let mut spec = RequestSpec::new(method, path);
    if let Some(body) = body {
        spec = spec.with_body(body);
    }

    router.request(&spec).await.map_err(|e| e.user_message())
}

pub async fn open_overlay(controller: &WindowController) -> Result<OverlayWindowState, String> {
    controller.toggle_overlay().await.map_err(|e| e.to_string())
}

pub async fn close_overlay(controller: &WindowController) -> Result<(), String> {
    controller.close_overlay().await.map_err(|e| e.to_string())
}

pub async fn overlay_status(controller: &WindowController) -> Result<OverlayWindowState, String> {
    Ok(controller.overlay_state().await)
}

/// Hand a query from the overlay to the main window.
pub async fn route_search(bus: &BusHandle, request: SearchRequest) -> Result<(), String> {
    info!("route_search: {:?} ({})", request.query, request.mode);
    bus.perform_search(request).await.map_err(|e| e.to_string())
}
