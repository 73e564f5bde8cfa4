//! Tauri commands over the desktop command surface.

use docseek_desktop::bus::SearchRequest;
use docseek_desktop::service::ServiceStatus;
use docseek_desktop::window::OverlayWindowState;
use docseek_desktop::{DesktopApp, commands};

use std::sync::Arc;

use serde_json::Value;
use tauri::State;

#[tauri::command]
pub async fn start_service(app: State<'_, Arc<DesktopApp>>) -> Result<ServiceStatus, String> {
    commands::start_service(app.supervisor()).await
}

#[tauri::command]
pub async fn stop_service(app: State<'_, Arc<DesktopApp>>) -> Result<(), String> {
    commands::stop_service(app.supervisor()).await
}

#[tauri::command]
pub async fn service_status(app: State<'_, Arc<DesktopApp>>) -> Result<ServiceStatus, String> {
    commands::service_status(app.supervisor()).await
}

#[tauri::command]
pub async fn forward_request(
    app: State<'_, Arc<DesktopApp>>,
    method: String,
    path: String,
    body: Option<Value>,
) -> Result<Value, String> {
    commands::forward_request(app.router(), &method, &path, body).await
}

#[tauri::command]
pub async fn open_overlay(app: State<'_, Arc<DesktopApp>>) -> Result<OverlayWindowState, String> {
    commands::open_overlay(app.controller()).await
}

#[tauri::command]
pub async fn close_overlay(app: State<'_, Arc<DesktopApp>>) -> Result<(), String> {
    commands::close_overlay(app.controller()).await
}

#[tauri::command]
pub async fn overlay_status(app: State<'_, Arc<DesktopApp>>) -> Result<OverlayWindowState, String> {
    commands::overlay_status(app.controller()).await
}

/// The presentation is derived from `mode`.
#[tauri::command]
pub async fn route_search(
    app: State<'_, Arc<DesktopApp>>,
    query: String,
    mode: String,
) -> Result<(), String> {
    commands::route_search(app.bus(), SearchRequest::new(query, mode)).await
}
