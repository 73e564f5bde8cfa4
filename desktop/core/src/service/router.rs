//! Forwards window requests to the running service.

use crate::service::{RequestSpec, ServiceError, ServiceResult, ServiceSupervisor, TimeoutPolicy};

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

/// Sends requests to the service with a per-path timeout.
///
/// The running check and the HTTP call are not atomic: the service may
/// exit in between, in which case the call fails as a RequestFailure.
/// Nothing is retried here.
pub struct RequestRouter {
    supervisor: Arc<ServiceSupervisor>,
    client: reqwest::Client,
    base_url: String,
    policy: TimeoutPolicy,
}

impl RequestRouter {
    pub fn new(
        supervisor: Arc<ServiceSupervisor>,
        base_url: &str,
        policy: TimeoutPolicy,
    ) -> ServiceResult<Self> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            supervisor,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
        })
    }

    pub fn policy(&self) -> &TimeoutPolicy {
        &self.policy
    }

    pub async fn request(&self, spec: &RequestSpec) -> ServiceResult<Value> {
        if !self.supervisor.is_running().await {
            return Err(ServiceError::not_running());
        }

        let timeout = self.policy.resolve(&spec.path);
        info!(
            "Forwarding {} {} (timeout {}s)",
            spec.method,
            spec.path,
            timeout.as_secs()
        );

        let url = format!("{}{}", self.base_url, spec.path);
        let mut req = self
            .client
            .request(spec.method.clone(), &url)
            .timeout(timeout);
        if let Some(body) = &spec.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            warn!("Request {} failed: {e}", spec.path);
            ServiceError::request_failure(&spec.path, e.to_string())
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::request_failure(&spec.path, e.to_string()))?;

        if !status.is_success() {
            let detail = String::from_utf8_lossy(&bytes);
            warn!("Request {} returned HTTP {status}", spec.path);
            return Err(ServiceError::request_failure(
                &spec.path,
                format!("HTTP {status}: {}", detail.trim()),
            ));
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            ServiceError::request_failure(&spec.path, format!("Invalid JSON response: {e}"))
        })
    }
}
