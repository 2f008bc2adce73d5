use crate::endpoint::{Endpoint, PersistedEndpoint, rank};
use crate::monitor::{
    EndpointMonitorView, MonitorRecord, MonitorStatus, MonitorUpdate, SNIPPET_LIMIT,
    StatusSummary, truncate_snippet,
};
use crate::store::{EndpointStore, StoreError};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// What happened when one endpoint was asked for one logical path.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorOutcome {
    pub status: MonitorStatus,
    pub latency: Option<Duration>,
    pub error: Option<String>,
    pub snippet: Option<String>,
}

impl MonitorOutcome {
    pub fn up(latency: Duration, snippet: Option<String>) -> Self {
        Self {
            status: MonitorStatus::Up,
            latency: Some(latency),
            error: None,
            snippet,
        }
    }

    pub fn failed(status: MonitorStatus, error: impl Into<String>) -> Self {
        Self {
            status,
            latency: None,
            error: Some(error.into()),
            snippet: None,
        }
    }

    pub fn with_latency(mut self, latency: Option<Duration>) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_snippet(mut self, snippet: Option<String>) -> Self {
        self.snippet = snippet;
        self
    }
}

/// Writes per-path outcomes and serves the dashboard read model.
#[derive(Clone)]
pub struct MonitorRecorder {
    store: Arc<dyn EndpointStore>,
    snippet_limit: usize,
}

impl MonitorRecorder {
    pub fn new(store: Arc<dyn EndpointStore>) -> Self {
        Self {
            store,
            snippet_limit: SNIPPET_LIMIT,
        }
    }

    pub fn with_snippet_limit(mut self, limit: usize) -> Self {
        self.snippet_limit = limit;
        self
    }

    /// Upserts the record for `(endpoint, logical_path)`.
    ///
    /// Returns `None` for the default endpoint and when the store refuses the
    /// write; neither case is allowed to fail the request being served.
    pub fn record(
        &self,
        endpoint: &Endpoint,
        logical_path: &str,
        outcome: MonitorOutcome,
    ) -> Option<MonitorRecord> {
        let Some(endpoint_id) = endpoint.id() else {
            debug!(endpoint = endpoint.name(), path = logical_path, "default endpoint is not monitored");
            return None;
        };

        let update = MonitorUpdate {
            endpoint_id,
            logical_path: logical_path.to_string(),
            status: outcome.status,
            response_time_ms: outcome.latency.map(|d| d.as_millis() as u64),
            error_message: outcome.error,
            response_snippet: outcome
                .snippet
                .map(|s| truncate_snippet(&s, self.snippet_limit)),
            checked_at: Utc::now(),
        };

        match self.store.upsert_monitor(&update) {
            Ok(record) => Some(record),
            Err(e) => {
                error!(
                    event = "monitor_write_failed",
                    endpoint = endpoint.name(),
                    path = logical_path,
                    error = %e
                );
                None
            }
        }
    }

    /// [`MonitorRecorder::record`] on the blocking pool, for callers on an async worker.
    pub async fn record_blocking(
        &self,
        endpoint: &Endpoint,
        logical_path: &str,
        outcome: MonitorOutcome,
    ) -> Option<MonitorRecord> {
        if endpoint.id().is_none() {
            return self.record(endpoint, logical_path, outcome);
        }

        let recorder = self.clone();
        let endpoint = endpoint.clone();
        let path = logical_path.to_string();
        let task = tokio::task::spawn_blocking(move || recorder.record(&endpoint, &path, outcome));

        match task.await {
            Ok(record) => record,
            Err(e) => {
                error!(event = "monitor_write_failed", path = logical_path, error = %e);
                None
            }
        }
    }

    /// Active endpoints in ranked order, each with its records sorted by path.
    pub fn by_endpoint(&self) -> Result<Vec<EndpointMonitorView>, StoreError> {
        let mut endpoints: Vec<PersistedEndpoint> = self
            .store
            .list_endpoints()?
            .into_iter()
            .filter(|e| e.active)
            .collect();
        rank(&mut endpoints);

        let mut grouped: HashMap<_, Vec<MonitorRecord>> = HashMap::new();
        for record in self.store.list_monitors()? {
            grouped.entry(record.endpoint_id).or_default().push(record);
        }

        Ok(endpoints
            .into_iter()
            .map(|endpoint| {
                let mut paths = grouped.remove(&endpoint.id).unwrap_or_default();
                paths.sort_by(|a, b| a.logical_path.cmp(&b.logical_path));
                EndpointMonitorView::new(endpoint, paths)
            })
            .collect())
    }

    pub fn summary(&self) -> Result<StatusSummary, StoreError> {
        Ok(StatusSummary::from_views(self.by_endpoint()?))
    }
}

impl std::fmt::Debug for MonitorRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorRecorder")
            .field("snippet_limit", &self.snippet_limit)
            .finish_non_exhaustive()
    }
}
