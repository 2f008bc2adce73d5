//! One-shot status check of every active endpoint over the monitored paths.

use crate::endpoint::Endpoint;
use crate::fallback::{Dispatcher, LogicalCall};
use crate::monitor::{MonitorRecorder, MonitorStatus, StatusCounts};
use crate::registry::EndpointRegistry;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Logical path that receives the search query during checks.
const SEARCH_PATH: &str = "search";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathCheck {
    pub endpoint: String,
    pub path: String,
    pub status: MonitorStatus,
    pub response_time_ms: Option<u64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusCheckReport {
    pub checks: Vec<PathCheck>,
    pub counts: StatusCounts,
}

/// Hits each path once per endpoint with no fallback and records what happened.
#[derive(Debug, Clone)]
pub struct StatusChecker {
    registry: Arc<EndpointRegistry>,
    dispatcher: Dispatcher,
    recorder: MonitorRecorder,
    paths: Vec<String>,
    search_query: String,
}

impl StatusChecker {
    pub fn new(
        registry: Arc<EndpointRegistry>,
        dispatcher: Dispatcher,
        recorder: MonitorRecorder,
        paths: Vec<String>,
        search_query: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            recorder,
            paths,
            search_query: search_query.into(),
        }
    }

    fn call_for(&self, path: &str) -> LogicalCall {
        let params = if path == SEARCH_PATH {
            vec![("query".to_string(), self.search_query.clone())]
        } else {
            Vec::new()
        };
        LogicalCall::get(path, params)
    }

    pub async fn check_all(&self) -> StatusCheckReport {
        let mut report = StatusCheckReport::default();

        for endpoint in self.registry.list_active() {
            let endpoint = Endpoint::Persisted(endpoint);

            for path in &self.paths {
                let call = self.call_for(path);
                let outcome = self.dispatcher.dispatch(&endpoint, &call, false).await;
                let monitored = outcome.to_monitor_outcome();

                report.counts.add(monitored.status);
                report.checks.push(PathCheck {
                    endpoint: endpoint.name().to_string(),
                    path: path.clone(),
                    status: monitored.status,
                    response_time_ms: monitored.latency.map(|d| d.as_millis() as u64),
                    error: monitored.error.clone(),
                });
                self.recorder.record_blocking(&endpoint, path, monitored).await;
            }
        }

        self.registry.invalidate();
        info!(
            event = "status_check_complete",
            checks = report.checks.len(),
            up = report.counts.up
        );
        report
    }
}
