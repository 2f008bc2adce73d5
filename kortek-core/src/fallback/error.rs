use crate::monitor::MonitorStatus;
use crate::response::Rejection;
use crate::transport::TransportError;

/// Why one candidate failed. Handled inside the session, never returned to callers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HopFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("upstream returned HTTP {0}")]
    HttpStatus(u16),

    #[error("malformed response body: {0}")]
    MalformedBody(String),

    #[error("response rejected: {0}")]
    LowConfidence(Rejection),
}

impl HopFailure {
    pub fn monitor_status(&self) -> MonitorStatus {
        match self {
            HopFailure::Transport(TransportError::Timeout(_)) => MonitorStatus::Timeout,
            HopFailure::Transport(_) => MonitorStatus::Down,
            HopFailure::HttpStatus(code) if *code >= 500 => MonitorStatus::Down,
            HopFailure::HttpStatus(_) => MonitorStatus::Error,
            HopFailure::MalformedBody(_) | HopFailure::LowConfidence(_) => MonitorStatus::Error,
        }
    }
}

/// One failed attempt, kept for the terminal error.
#[derive(Debug, Clone, PartialEq)]
pub struct HopReport {
    pub endpoint: String,
    pub failure: HopFailure,
}

#[derive(Debug, thiserror::Error)]
pub enum FallbackError {
    #[error("no endpoint is configured")]
    NoCandidates,

    #[error("all {} endpoint(s) failed for '{path}'", attempts.len())]
    Exhausted {
        path: String,
        attempts: Vec<HopReport>,
    },
}
