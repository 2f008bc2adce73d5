//! Scripted collaborators shared by unit tests.

use crate::cache::{MemoryCache, SharedCache};
use crate::endpoint::{DefaultEndpoint, NewEndpoint, PersistedEndpoint};
use crate::registry::EndpointRegistry;
use crate::store::{EndpointStore, MemoryStore};
use crate::transport::{TransportError, UpstreamRequest, UpstreamResponse, UpstreamTransport};
use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Json(u16, Value),
    Raw(u16, String),
    Fail(TransportError),
}

/// Answers by exact URL; unknown URLs fail to connect.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: Mutex<HashMap<String, Reply>>,
    seen: Mutex<Vec<UpstreamRequest>>,
    watched: Mutex<Option<(Arc<dyn SharedCache>, String)>>,
    observed: Mutex<Vec<bool>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn route(&self, url: &str, reply: Reply) {
        self.routes.lock().unwrap().insert(url.to_string(), reply);
    }

    /// Records, at every send, whether `key` was present in `cache`.
    pub(crate) fn watch_cache_key(&self, cache: Arc<dyn SharedCache>, key: &str) {
        *self.watched.lock().unwrap() = Some((cache, key.to_string()));
    }

    pub(crate) fn observed(&self) -> Vec<bool> {
        self.observed.lock().unwrap().clone()
    }

    pub(crate) fn requests(&self) -> Vec<UpstreamRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamTransport for ScriptedTransport {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, TransportError> {
        if let Some((cache, key)) = self.watched.lock().unwrap().as_ref() {
            self.observed.lock().unwrap().push(cache.get(key).is_some());
        }

        let reply = self.routes.lock().unwrap().get(&request.url).cloned();
        self.seen.lock().unwrap().push(request.clone());

        match reply {
            Some(Reply::Json(status, body)) => Ok(UpstreamResponse {
                status: StatusCode::from_u16(status).unwrap(),
                body: body.to_string(),
            }),
            Some(Reply::Raw(status, body)) => Ok(UpstreamResponse {
                status: StatusCode::from_u16(status).unwrap(),
                body,
            }),
            Some(Reply::Fail(err)) => Err(err),
            None => Err(TransportError::Connect(format!("no route to {}", request.url))),
        }
    }
}

pub(crate) struct Fixture {
    pub store: Arc<MemoryStore>,
    pub cache: Arc<MemoryCache>,
    pub registry: Arc<EndpointRegistry>,
}

pub(crate) fn default_endpoint() -> DefaultEndpoint {
    DefaultEndpoint {
        name: "Default".to_string(),
        url: "http://localhost:8001/api/v1".to_string(),
        source_domain: "gomunime.co".to_string(),
    }
}

pub(crate) fn fixture(default: Option<DefaultEndpoint>) -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(MemoryCache::new());
    let registry = Arc::new(EndpointRegistry::new(
        store.clone(),
        cache.clone(),
        default,
        Duration::from_secs(300),
    ));
    Fixture {
        store,
        cache,
        registry,
    }
}

impl Fixture {
    pub(crate) fn add(&self, name: &str, url: &str, priority: i32) -> PersistedEndpoint {
        self.registry
            .create(NewEndpoint::new(name, url, priority))
            .unwrap()
    }

    pub(crate) fn reload(&self, endpoint: &PersistedEndpoint) -> PersistedEndpoint {
        self.store.get_endpoint(endpoint.id).unwrap().unwrap()
    }
}
