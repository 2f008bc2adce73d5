use crate::endpoint::{DefaultEndpoint, Endpoint, PersistedEndpoint, rank};

/// Ranked, immutable snapshot of the endpoints one call may try.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateList(Vec<Endpoint>);

impl CandidateList {
    /// Ranks `active`; falls back to the default endpoint when nothing is active.
    pub fn new(mut active: Vec<PersistedEndpoint>, default: Option<&DefaultEndpoint>) -> Self {
        active.retain(|e| e.active);
        if active.is_empty() {
            return Self(default.cloned().map(Endpoint::Default).into_iter().collect());
        }

        rank(&mut active);
        Self(active.into_iter().map(Endpoint::Persisted).collect())
    }

    pub fn get(&self, index: usize) -> Option<&Endpoint> {
        self.0.get(index)
    }

    pub fn first(&self) -> Option<&Endpoint> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.0.iter()
    }
}
