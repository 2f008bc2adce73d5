use crate::endpoint::{Endpoint, EndpointId};
use crate::health::HealthProber;
use crate::registry::EndpointRegistry;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepReport {
    pub healthy: Vec<String>,
    pub unhealthy: Vec<String>,
    pub deactivated: Vec<String>,
}

/// Deactivates endpoints that fail `threshold` consecutive probes.
///
/// Counters live for the lifetime of the sweep value; a successful probe resets them.
#[derive(Debug)]
pub struct HealthSweep {
    prober: HealthProber,
    registry: Arc<EndpointRegistry>,
    threshold: u32,
    failures: DashMap<EndpointId, u32>,
}

impl HealthSweep {
    pub fn new(prober: HealthProber, registry: Arc<EndpointRegistry>, threshold: u32) -> Self {
        Self {
            prober,
            registry,
            threshold: threshold.max(1),
            failures: DashMap::new(),
        }
    }

    pub fn consecutive_failures(&self, id: EndpointId) -> u32 {
        self.failures.get(&id).map(|n| *n).unwrap_or(0)
    }

    pub async fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();

        for endpoint in self.registry.list_active() {
            let id = endpoint.id;
            let name = endpoint.name.clone();
            let result = self
                .prober
                .probe_detailed(&Endpoint::Persisted(endpoint))
                .await;

            if result.healthy {
                self.failures.remove(&id);
                debug!(endpoint = %name, "health probe passed");
                report.healthy.push(name);
                continue;
            }

            let failures = {
                let mut count = self.failures.entry(id).or_insert(0);
                *count += 1;
                *count
            };
            report.unhealthy.push(name.clone());

            if failures < self.threshold {
                debug!(endpoint = %name, failures, detail = %result.detail, "health probe failed");
                continue;
            }

            match self.registry.set_active(id, false) {
                Ok(_) => {
                    self.failures.remove(&id);
                    warn!(
                        event = "endpoint_deactivated",
                        endpoint = %name,
                        failures,
                        detail = %result.detail
                    );
                    report.deactivated.push(name);
                }
                Err(e) => error!(endpoint = %name, error = %e, "failed to deactivate endpoint"),
            }
        }

        report
    }
}
