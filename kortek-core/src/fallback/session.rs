use crate::endpoint::Endpoint;
use crate::fallback::{FallbackError, HopReport};
use crate::registry::CandidateList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Dispatching(usize),
    Accepted(usize),
    Rejected(usize),
    Exhausted,
}

/// State of one top-level call: its own candidate list and cursor.
///
/// Sessions are never shared, so concurrent calls cannot move each other's cursor.
#[derive(Debug)]
pub struct FallbackSession {
    candidates: CandidateList,
    state: SessionState,
    failures: Vec<HopReport>,
}

impl FallbackSession {
    pub fn begin(candidates: CandidateList) -> Result<Self, FallbackError> {
        if candidates.is_empty() {
            return Err(FallbackError::NoCandidates);
        }

        Ok(Self {
            candidates,
            state: SessionState::Dispatching(0),
            failures: Vec::new(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    /// The endpoint to dispatch to, or `None` once the session has settled.
    pub fn current(&self) -> Option<&Endpoint> {
        match self.state {
            SessionState::Dispatching(i) => self.candidates.get(i),
            _ => None,
        }
    }

    /// Zero-based index of the attempt in progress.
    pub fn attempt(&self) -> usize {
        match self.state {
            SessionState::Dispatching(i) | SessionState::Accepted(i) | SessionState::Rejected(i) => i,
            SessionState::Exhausted => self.candidates.len(),
        }
    }

    pub fn is_retry(&self) -> bool {
        self.attempt() > 0
    }

    pub fn accept(&mut self) {
        if let SessionState::Dispatching(i) = self.state {
            self.state = SessionState::Accepted(i);
        }
    }

    pub fn reject(&mut self, report: HopReport) {
        if let SessionState::Dispatching(i) = self.state {
            self.failures.push(report);
            self.state = SessionState::Rejected(i);
        }
    }

    /// Moves past a rejected candidate. Returns `false` once the list is used up.
    pub fn advance(&mut self) -> bool {
        let SessionState::Rejected(i) = self.state else {
            return false;
        };

        if i + 1 < self.candidates.len() {
            self.state = SessionState::Dispatching(i + 1);
            true
        } else {
            self.state = SessionState::Exhausted;
            false
        }
    }

    pub fn failures(&self) -> &[HopReport] {
        &self.failures
    }

    pub fn into_error(self, path: &str) -> FallbackError {
        FallbackError::Exhausted {
            path: path.to_string(),
            attempts: self.failures,
        }
    }
}
