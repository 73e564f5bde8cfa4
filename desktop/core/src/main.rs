//! docseek - headless control of the search service
//!
//! # Examples
//!
//! ```bash
//! # Run the service in the foreground
//! docseek serve
//!
//! # One-off search
//! docseek request "/search?q=invoice" --pretty
//!
//! # Index a folder
//! docseek request /index -X POST --body '{"path": "/home/me/docs"}'
//! ```

mod cli;

use crate::cli::{Cli, Commands};

use docseek_desktop::{
    ServiceStack, bootstrap, commands,
    service::{HealthProbe, HttpHealthProbe, ServiceState},
};

use std::process::ExitCode;

use clap::Parser;
use docseek_config::Config;
use serde_json::{Value, json};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match bootstrap() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Serve => serve(&config).await,
        Commands::Status => status(&config).await,
        Commands::Request { path, method, body } => {
            request(&config, &method, &path, body.as_deref()).await
        }
    };

    match result {
        Ok(Value::Null) => ExitCode::SUCCESS,
        Ok(value) => {
            let output = if cli.pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };
            match output {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: &Config) -> Result<Value, String> {
    let stack = ServiceStack::from_config(config).map_err(|e| e.to_string())?;

    let mut state_rx = stack.supervisor.subscribe();
    tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            let state = state_rx.borrow().clone();
            info!("Service state: {}", state.label());
            if let ServiceState::Failed { error } = state {
                error!("Service failed: {error}");
            }
        }
    });

    let status = commands::start_service(&stack.supervisor).await?;
    info!("Serving at {} (pid {:?})", status.base_url, status.pid);

    wait_for_shutdown_signal().await;

    commands::stop_service(&stack.supervisor).await?;
    Ok(Value::Null)
}

async fn status(config: &Config) -> Result<Value, String> {
    let base_url = config.service.base_url();
    let probe = HttpHealthProbe::new(&base_url, config.supervisor.probe_timeout())
        .map_err(|e| e.to_string())?;

    let healthy = probe.probe().await;
    Ok(json!({
        "base_url": base_url,
        "health_url": probe.url(),
        "healthy": healthy.is_ok(),
        "error": healthy.err(),
    }))
}

async fn request(
    config: &Config,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> Result<Value, String> {
    let body = body
        .map(serde_json::from_str::<Value>)
        .transpose()
        .map_err(|e| format!("Invalid JSON body: {e}"))?;

    let stack = ServiceStack::from_config(config).map_err(|e| e.to_string())?;
    commands::start_service(&stack.supervisor).await?;

    let result = commands::forward_request(&stack.router, method, path, body).await;

    if let Err(e) = commands::stop_service(&stack.supervisor).await {
        error!("Failed to stop service: {e}");
    }
    result
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = match Signals::new([SIGINT, SIGTERM]) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to register signal handlers, falling back to Ctrl+C: {e}");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    let received = tokio::task::spawn_blocking(move || signals.forever().next()).await;
    if let Ok(Some(sig)) = received {
        info!("Received signal {sig}, shutting down...");
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down..."),
        Err(e) => error!("Failed to listen for Ctrl+C: {e}"),
    }
}
