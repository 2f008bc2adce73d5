use crate::endpoint::{Endpoint, health_url};
use crate::transport::{UpstreamRequest, UpstreamTransport};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Status values a liveness body may report.
const HEALTHY_STATUSES: [&str; 2] = ["ok", "healthy"];

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub healthy: bool,
    pub latency: Option<Duration>,
    pub detail: String,
}

/// Liveness check against an endpoint's service root.
#[derive(Clone)]
pub struct HealthProber {
    transport: Arc<dyn UpstreamTransport>,
    path: String,
    timeout: Duration,
}

impl HealthProber {
    pub fn new(transport: Arc<dyn UpstreamTransport>, path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            path: path.into(),
            timeout,
        }
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        health_url(endpoint.url(), &self.path)
    }

    pub async fn probe(&self, endpoint: &Endpoint) -> bool {
        self.probe_detailed(endpoint).await.healthy
    }

    /// Never fails: every problem is reported as an unhealthy result.
    pub async fn probe_detailed(&self, endpoint: &Endpoint) -> ProbeResult {
        let request = UpstreamRequest::get(self.url_for(endpoint), self.timeout);
        let started = Instant::now();

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                return ProbeResult {
                    healthy: false,
                    latency: None,
                    detail: e.to_string(),
                };
            }
        };
        let latency = Some(started.elapsed());

        if !response.status.is_success() {
            return ProbeResult {
                healthy: false,
                latency,
                detail: format!("HTTP {}", response.status.as_u16()),
            };
        }

        let status = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|body| body.get("status").and_then(Value::as_str).map(str::to_string));

        match status {
            Some(s) if HEALTHY_STATUSES.iter().any(|h| s.eq_ignore_ascii_case(h)) => ProbeResult {
                healthy: true,
                latency,
                detail: s,
            },
            Some(s) => ProbeResult {
                healthy: false,
                latency,
                detail: format!("reported status '{s}'"),
            },
            None => ProbeResult {
                healthy: false,
                latency,
                detail: "health body carries no status".to_string(),
            },
        }
    }
}

impl std::fmt::Debug for HealthProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthProber")
            .field("path", &self.path)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
