use crate::endpoint::EndpointId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Snippets longer than this many characters are cut.
pub const SNIPPET_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    Up,
    Down,
    Error,
    Timeout,
    Unknown,
}

impl MonitorStatus {
    pub const ALL: [MonitorStatus; 5] = [
        MonitorStatus::Up,
        MonitorStatus::Down,
        MonitorStatus::Error,
        MonitorStatus::Timeout,
        MonitorStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorStatus::Up => "up",
            MonitorStatus::Down => "down",
            MonitorStatus::Error => "error",
            MonitorStatus::Timeout => "timeout",
            MonitorStatus::Unknown => "unknown",
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, MonitorStatus::Up)
    }
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown monitor status '{0}'")]
pub struct ParseMonitorStatusError(pub String);

impl FromStr for MonitorStatus {
    type Err = ParseMonitorStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(MonitorStatus::Up),
            "down" => Ok(MonitorStatus::Down),
            "error" => Ok(MonitorStatus::Error),
            "timeout" => Ok(MonitorStatus::Timeout),
            "unknown" => Ok(MonitorStatus::Unknown),
            other => Err(ParseMonitorStatusError(other.to_string())),
        }
    }
}

/// Latest known outcome for one (endpoint, logical path) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorRecord {
    pub endpoint_id: EndpointId,
    pub logical_path: String,
    pub status: MonitorStatus,
    pub response_time_ms: Option<u64>,
    pub error_message: Option<String>,
    pub response_snippet: Option<String>,
    pub last_checked: DateTime<Utc>,
}

/// Write side of a monitor record. An `Up` status also bumps the endpoint's
/// success counter and last-used timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorUpdate {
    pub endpoint_id: EndpointId,
    pub logical_path: String,
    pub status: MonitorStatus,
    pub response_time_ms: Option<u64>,
    pub error_message: Option<String>,
    pub response_snippet: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl MonitorUpdate {
    pub fn into_record(self) -> MonitorRecord {
        MonitorRecord {
            endpoint_id: self.endpoint_id,
            logical_path: self.logical_path,
            status: self.status,
            response_time_ms: self.response_time_ms,
            error_message: self.error_message,
            response_snippet: self.response_snippet,
            last_checked: self.checked_at,
        }
    }
}

/// Cuts `text` to at most `limit` characters without splitting a code point.
pub fn truncate_snippet(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
