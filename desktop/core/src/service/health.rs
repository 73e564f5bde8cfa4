//! Liveness probing with a graduated retry schedule.

use crate::service::{ServiceError, ServiceResult};

use std::panic::Location;
use std::time::Duration;

use async_trait::async_trait;
use error_location::ErrorLocation;
use tokio::time::Instant;
use tracing::{debug, info};

const HEALTH_ENDPOINT: &str = "/health";

/// One liveness check against the service.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// `Err` carries a human-readable reason.
    async fn probe(&self) -> Result<(), String>;
}

/// Probes `GET {base_url}/health`.
pub struct HttpHealthProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpHealthProbe {
    pub fn new(base_url: &str, timeout: Duration) -> ServiceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(1)
            .build()?;

        Ok(Self {
            client,
            url: format!("{}{HEALTH_ENDPOINT}", base_url.trim_end_matches('/')),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn probe(&self) -> Result<(), String> {
        match self.client.get(&self.url).send().await {
            Ok(resp) if resp.status().is_success() => Ok(()),
            Ok(resp) => Err(format!("HTTP {}", resp.status())),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Delay taken before the given 1-based attempt.
///
/// Attempts 1-3 wait 1s, 4-6 wait 2s, everything after waits 3s.
pub fn delay_before_attempt(attempt: u32) -> Duration {
    match attempt {
        0..=3 => Duration::from_secs(1),
        4..=6 => Duration::from_secs(2),
        _ => Duration::from_secs(3),
    }
}

/// Longest a start attempt can spend in `wait_until_healthy`: every delay
/// plus every probe running into its timeout.
pub fn startup_budget(max_attempts: u32, probe_timeout: Duration) -> Duration {
    (1..=max_attempts)
        .map(delay_before_attempt)
        .sum::<Duration>()
        + probe_timeout * max_attempts
}

/// Probe until healthy or `max_attempts` probes have failed.
///
/// Returns the number of attempts it took. There is no way to cancel the
/// loop once started.
pub async fn wait_until_healthy(probe: &dyn HealthProbe, max_attempts: u32) -> ServiceResult<u32> {
    let started = Instant::now();
    let mut last_error = String::from("no probe attempted");

    for attempt in 1..=max_attempts {
        tokio::time::sleep(delay_before_attempt(attempt)).await;

        match probe.probe().await {
            Ok(()) => {
                info!(
                    "Service healthy after {attempt} attempt(s) ({:.1}s)",
                    started.elapsed().as_secs_f64()
                );
                return Ok(attempt);
            }
            Err(e) => {
                debug!("Health probe {attempt}/{max_attempts} failed: {e}");
                last_error = e;
            }
        }
    }

    Err(ServiceError::HealthCheckTimeout {
        attempts: max_attempts,
        elapsed_secs: started.elapsed().as_secs_f64(),
        last_error,
        location: ErrorLocation::from(Location::caller()),
    })
}
