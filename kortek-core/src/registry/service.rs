use crate::cache::{
    ENDPOINT_INFO_KEY, ENDPOINTS_KEY, SOURCE_DOMAIN_KEY, SharedCache, purge_endpoint_class,
};
use crate::conf::EndpointSeedConfig;
use crate::endpoint::{
    DefaultEndpoint, EndpointId, EndpointInfo, EndpointPatch, NewEndpoint, PersistedEndpoint,
    normalize_base_url, rank,
};
use crate::fallback::FallbackError;
use crate::registry::{CandidateList, RegistryError};
use crate::source_domain::is_valid_domain;
use crate::store::EndpointStore;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, error, info};

/// Source of truth for which providers exist and in which order they are tried.
///
/// Reads go through a cached snapshot; every mutation invalidates the
/// endpoint-derived cache entries before returning.
pub struct EndpointRegistry {
    store: Arc<dyn EndpointStore>,
    cache: Arc<dyn SharedCache>,
    default_endpoint: Option<DefaultEndpoint>,
    snapshot_ttl: Duration,
    /// Bumped by every invalidation. A snapshot computed under an older
    /// generation is never left in the cache.
    generation: AtomicU64,
}

impl EndpointRegistry {
    pub fn new(
        store: Arc<dyn EndpointStore>,
        cache: Arc<dyn SharedCache>,
        default_endpoint: Option<DefaultEndpoint>,
        snapshot_ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            default_endpoint,
            snapshot_ttl,
            generation: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &Arc<dyn EndpointStore> {
        &self.store
    }

    pub fn default_endpoint(&self) -> Option<&DefaultEndpoint> {
        self.default_endpoint.as_ref()
    }

    /// Active endpoints, ranked. Store failures degrade to an empty list.
    pub fn list_active(&self) -> Vec<PersistedEndpoint> {
        if let Some(cached) = self.cache.get(ENDPOINTS_KEY) {
            match serde_json::from_value::<Vec<PersistedEndpoint>>(cached) {
                Ok(endpoints) => return endpoints,
                Err(e) => {
                    debug!(error = %e, "discarding unreadable endpoint snapshot");
                    self.cache.delete(ENDPOINTS_KEY);
                }
            }
        }

        let generation = self.generation.load(Ordering::Acquire);
        let mut active: Vec<PersistedEndpoint> = match self.store.list_endpoints() {
            Ok(all) => all.into_iter().filter(|e| e.active).collect(),
            Err(e) => {
                error!(event = "registry_read_failed", error = %e);
                return Vec::new();
            }
        };
        rank(&mut active);

        if let Ok(value) = serde_json::to_value(&active) {
            self.publish(ENDPOINTS_KEY, value, generation);
        }
        active
    }

    /// Every endpoint, active or not, in candidate order.
    pub fn list_all(&self) -> Result<Vec<PersistedEndpoint>, RegistryError> {
        let mut all = self.store.list_endpoints()?;
        rank(&mut all);
        Ok(all)
    }

    pub fn get(&self, id: EndpointId) -> Result<PersistedEndpoint, RegistryError> {
        self.store
            .get_endpoint(id)?
            .ok_or(RegistryError::NotFound(id))
    }

    /// Fresh candidate list for one top-level call.
    pub fn candidates(&self) -> Result<CandidateList, FallbackError> {
        let list = CandidateList::new(self.list_active(), self.default_endpoint.as_ref());
        if list.is_empty() {
            return Err(FallbackError::NoCandidates);
        }
        Ok(list)
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        purge_endpoint_class(self.cache.as_ref());
    }

    /// Caches `value` unless an invalidation ran since `generation` was read.
    ///
    /// The generation is checked again after the write: an invalidation that
    /// bumped it in between may already have purged, so the write is undone.
    fn publish(&self, key: &str, value: Value, generation: u64) {
        if self.generation.load(Ordering::Acquire) != generation {
            debug!(key, "dropping snapshot computed before an invalidation");
            return;
        }
        self.cache.set(key, value, Some(self.snapshot_ttl));
        if self.generation.load(Ordering::Acquire) != generation {
            self.cache.delete(key);
        }
    }

    pub fn create(&self, new: NewEndpoint) -> Result<PersistedEndpoint, RegistryError> {
        let new = validate_new(new)?;
        let endpoint = self.store.insert_endpoint(&new, Utc::now())?;
        self.invalidate();

        info!(
            event = "endpoint_created",
            id = %endpoint.id,
            name = %endpoint.name,
            url = %endpoint.url,
            priority = endpoint.priority
        );
        Ok(endpoint)
    }

    pub fn update(
        &self,
        id: EndpointId,
        patch: EndpointPatch,
    ) -> Result<PersistedEndpoint, RegistryError> {
        let patch = validate_patch(patch)?;
        let mut endpoint = self.get(id)?;

        patch.apply(&mut endpoint);
        endpoint.updated_at = Utc::now();

        if !self.store.save_endpoint(&endpoint)? {
            return Err(RegistryError::NotFound(id));
        }
        self.invalidate();

        info!(event = "endpoint_updated", id = %id, name = %endpoint.name);
        Ok(endpoint)
    }

    pub fn delete(&self, id: EndpointId) -> Result<(), RegistryError> {
        if !self.store.delete_endpoint(id)? {
            return Err(RegistryError::NotFound(id));
        }
        self.invalidate();

        info!(event = "endpoint_deleted", id = %id);
        Ok(())
    }

    pub fn set_active(&self, id: EndpointId, active: bool) -> Result<PersistedEndpoint, RegistryError> {
        self.update(
            id,
            EndpointPatch {
                active: Some(active),
                ..EndpointPatch::default()
            },
        )
    }

    pub fn set_priority(
        &self,
        id: EndpointId,
        priority: i32,
    ) -> Result<PersistedEndpoint, RegistryError> {
        self.update(
            id,
            EndpointPatch {
                priority: Some(priority),
                ..EndpointPatch::default()
            },
        )
    }

    /// Inserts `seeds` when the store holds no endpoint at all. Returns how many were created.
    pub fn seed(&self, seeds: &[EndpointSeedConfig]) -> Result<usize, RegistryError> {
        if seeds.is_empty() || !self.store.list_endpoints()?.is_empty() {
            return Ok(0);
        }

        for seed in seeds {
            let mut new = NewEndpoint::new(&seed.name, &seed.url, seed.priority)
                .with_source_domain(&seed.source_domain);
            new.active = seed.active;
            self.create(new)?;
        }
        Ok(seeds.len())
    }

    /// Describes the endpoint a call would try first.
    pub fn current_endpoint_info(&self) -> Option<EndpointInfo> {
        if let Some(info) = self
            .cache
            .get(ENDPOINT_INFO_KEY)
            .and_then(|v| serde_json::from_value::<EndpointInfo>(v).ok())
        {
            return Some(info);
        }

        let generation = self.generation.load(Ordering::Acquire);
        let info = self.candidates().ok()?.first()?.info();
        if let Ok(value) = serde_json::to_value(&info) {
            self.publish(ENDPOINT_INFO_KEY, value, generation);
        }
        Some(info)
    }

    /// Domain that relative asset paths currently resolve against.
    pub fn current_source_domain(&self) -> String {
        if let Some(Value::String(domain)) = self.cache.get(SOURCE_DOMAIN_KEY) {
            return domain;
        }

        let generation = self.generation.load(Ordering::Acquire);
        let top = self
            .candidates()
            .ok()
            .and_then(|list| list.first().map(|e| e.source_domain().to_string()))
            .filter(|d| !d.is_empty());

        let domain = top
            .or_else(|| self.default_endpoint.as_ref().map(|d| d.source_domain.clone()))
            .unwrap_or_default();

        self.publish(SOURCE_DOMAIN_KEY, Value::String(domain.clone()), generation);
        domain
    }
}

fn validate_name(name: &str) -> Result<String, RegistryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RegistryError::Invalid("name must not be empty".to_string()));
    }
    Ok(name.to_string())
}

fn validate_domain(domain: &str) -> Result<String, RegistryError> {
    let domain = domain.trim();
    if !domain.is_empty() && !is_valid_domain(domain) {
        return Err(RegistryError::Invalid(format!(
            "source domain '{domain}' is not a valid host name"
        )));
    }
    Ok(domain.to_string())
}

fn validate_new(new: NewEndpoint) -> Result<NewEndpoint, RegistryError> {
    Ok(NewEndpoint {
        name: validate_name(&new.name)?,
        url: normalize_base_url(&new.url)?,
        source_domain: validate_domain(&new.source_domain)?,
        ..new
    })
}

fn validate_patch(patch: EndpointPatch) -> Result<EndpointPatch, RegistryError> {
    Ok(EndpointPatch {
        name: patch.name.as_deref().map(validate_name).transpose()?,
        url: patch.url.as_deref().map(normalize_base_url).transpose()?,
        source_domain: patch.source_domain.as_deref().map(validate_domain).transpose()?,
        ..patch
    })
}

impl std::fmt::Debug for EndpointRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointRegistry")
            .field("default_endpoint", &self.default_endpoint)
            .field("snapshot_ttl", &self.snapshot_ttl)
            .finish_non_exhaustive()
    }
}
