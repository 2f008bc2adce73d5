use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EndpointId(pub i64);

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An upstream provider stored in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedEndpoint {
    pub id: EndpointId,
    pub name: String,
    /// Normalized base URL, never ends with `/`.
    pub url: String,
    /// Host that relative asset paths returned by this provider resolve against.
    pub source_domain: String,
    /// Higher is tried first.
    pub priority: i32,
    pub active: bool,
    pub success_count: u64,
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Synthesized in memory when the registry has no active endpoint. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultEndpoint {
    pub name: String,
    pub url: String,
    pub source_domain: String,
}

/// A fallback candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    Persisted(PersistedEndpoint),
    Default(DefaultEndpoint),
}

impl Endpoint {
    pub fn id(&self) -> Option<EndpointId> {
        match self {
            Endpoint::Persisted(e) => Some(e.id),
            Endpoint::Default(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Endpoint::Persisted(e) => &e.name,
            Endpoint::Default(e) => &e.name,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Endpoint::Persisted(e) => &e.url,
            Endpoint::Default(e) => &e.url,
        }
    }

    pub fn source_domain(&self) -> &str {
        match self {
            Endpoint::Persisted(e) => &e.source_domain,
            Endpoint::Default(e) => &e.source_domain,
        }
    }

    pub fn priority(&self) -> i32 {
        match self {
            Endpoint::Persisted(e) => e.priority,
            Endpoint::Default(_) => 0,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Endpoint::Default(_))
    }

    pub fn info(&self) -> EndpointInfo {
        EndpointInfo {
            name: self.name().to_string(),
            url: self.url().to_string(),
            priority: self.priority(),
            source_domain: self.source_domain().to_string(),
            success_count: match self {
                Endpoint::Persisted(e) => e.success_count,
                Endpoint::Default(_) => 0,
            },
            is_default: self.is_default(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Persisted(e) => write!(f, "{} (#{}, {})", e.name, e.id, e.url),
            Endpoint::Default(e) => write!(f, "{} (default, {})", e.name, e.url),
        }
    }
}

/// What rendering and admin collaborators see of the authoritative endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub name: String,
    pub url: String,
    pub priority: i32,
    pub source_domain: String,
    pub success_count: u64,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEndpoint {
    pub name: String,
    pub url: String,
    pub source_domain: String,
    pub priority: i32,
    pub active: bool,
}

impl NewEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            source_domain: String::new(),
            priority,
            active: true,
        }
    }

    pub fn with_source_domain(mut self, domain: impl Into<String>) -> Self {
        self.source_domain = domain.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub source_domain: Option<String>,
    pub priority: Option<i32>,
    pub active: Option<bool>,
}

impl EndpointPatch {
    pub fn is_empty(&self) -> bool {
        self == &EndpointPatch::default()
    }

    pub(crate) fn apply(&self, endpoint: &mut PersistedEndpoint) {
        if let Some(name) = &self.name {
            endpoint.name = name.clone();
        }
        if let Some(url) = &self.url {
            endpoint.url = url.clone();
        }
        if let Some(domain) = &self.source_domain {
            endpoint.source_domain = domain.clone();
        }
        if let Some(priority) = self.priority {
            endpoint.priority = priority;
        }
        if let Some(active) = self.active {
            endpoint.active = active;
        }
    }
}

/// Ranking used everywhere candidates are listed: priority descending, then name ascending.
pub fn rank(endpoints: &mut [PersistedEndpoint]) {
    endpoints.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.name.cmp(&b.name)));
}
