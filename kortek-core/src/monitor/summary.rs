use crate::endpoint::PersistedEndpoint;
use crate::monitor::{MonitorRecord, MonitorStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointMonitorView {
    pub id: crate::endpoint::EndpointId,
    pub name: String,
    pub url: String,
    pub priority: i32,
    pub paths: Vec<MonitorRecord>,
}

impl EndpointMonitorView {
    pub fn new(endpoint: PersistedEndpoint, paths: Vec<MonitorRecord>) -> Self {
        Self {
            id: endpoint.id,
            name: endpoint.name,
            url: endpoint.url,
            priority: endpoint.priority,
            paths,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub up: usize,
    pub down: usize,
    pub error: usize,
    pub timeout: usize,
    pub unknown: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: MonitorStatus) {
        match status {
            MonitorStatus::Up => self.up += 1,
            MonitorStatus::Down => self.down += 1,
            MonitorStatus::Error => self.error += 1,
            MonitorStatus::Timeout => self.timeout += 1,
            MonitorStatus::Unknown => self.unknown += 1,
        }
    }

    pub fn get(&self, status: MonitorStatus) -> usize {
        match status {
            MonitorStatus::Up => self.up,
            MonitorStatus::Down => self.down,
            MonitorStatus::Error => self.error,
            MonitorStatus::Timeout => self.timeout,
            MonitorStatus::Unknown => self.unknown,
        }
    }

    pub fn total(&self) -> usize {
        self.up + self.down + self.error + self.timeout + self.unknown
    }
}

/// Dashboard summary over every active endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub total_endpoints: usize,
    pub endpoints: Vec<EndpointMonitorView>,
    pub status_counts: StatusCounts,
    /// Most recent `last_checked` across all records.
    pub last_updated: Option<DateTime<Utc>>,
}

impl StatusSummary {
    pub fn from_views(endpoints: Vec<EndpointMonitorView>) -> Self {
        let mut status_counts = StatusCounts::default();
        let mut last_updated: Option<DateTime<Utc>> = None;

        for record in endpoints.iter().flat_map(|e| e.paths.iter()) {
            status_counts.add(record.status);
            last_updated = last_updated.max(Some(record.last_checked));
        }

        Self {
            total_endpoints: endpoints.len(),
            endpoints,
            status_counts,
            last_updated,
        }
    }
}
