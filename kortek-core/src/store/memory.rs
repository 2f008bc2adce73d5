use crate::endpoint::{EndpointId, NewEndpoint, PersistedEndpoint};
use crate::monitor::{MonitorRecord, MonitorUpdate};
use crate::store::{EndpointStore, StoreError};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    endpoints: BTreeMap<EndpointId, PersistedEndpoint>,
    monitors: BTreeMap<(EndpointId, String), MonitorRecord>,
}

/// Process-local store. Used when no database is configured, and by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl EndpointStore for MemoryStore {
    fn list_endpoints(&self) -> Result<Vec<PersistedEndpoint>, StoreError> {
        Ok(self.read()?.endpoints.values().cloned().collect())
    }

    fn get_endpoint(&self, id: EndpointId) -> Result<Option<PersistedEndpoint>, StoreError> {
        Ok(self.read()?.endpoints.get(&id).cloned())
    }

    fn insert_endpoint(
        &self,
        new: &NewEndpoint,
        now: DateTime<Utc>,
    ) -> Result<PersistedEndpoint, StoreError> {
        let mut state = self.write()?;
        state.next_id += 1;

        let endpoint = PersistedEndpoint {
            id: EndpointId(state.next_id),
            name: new.name.clone(),
            url: new.url.clone(),
            source_domain: new.source_domain.clone(),
            priority: new.priority,
            active: new.active,
            success_count: 0,
            last_used: None,
            created_at: now,
            updated_at: now,
        };

        state.endpoints.insert(endpoint.id, endpoint.clone());
        Ok(endpoint)
    }

    fn save_endpoint(&self, endpoint: &PersistedEndpoint) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        let Some(existing) = state.endpoints.get_mut(&endpoint.id) else {
            return Ok(false);
        };

        existing.name = endpoint.name.clone();
        existing.url = endpoint.url.clone();
        existing.source_domain = endpoint.source_domain.clone();
        existing.priority = endpoint.priority;
        existing.active = endpoint.active;
        existing.updated_at = endpoint.updated_at;
        Ok(true)
    }

    fn delete_endpoint(&self, id: EndpointId) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        let removed = state.endpoints.remove(&id).is_some();
        state.monitors.retain(|(endpoint_id, _), _| *endpoint_id != id);
        Ok(removed)
    }

    fn upsert_monitor(&self, update: &MonitorUpdate) -> Result<MonitorRecord, StoreError> {
        let mut state = self.write()?;

        // Both writes happen under the same guard.
        let endpoint = state
            .endpoints
            .get_mut(&update.endpoint_id)
            .ok_or(StoreError::UnknownEndpoint(update.endpoint_id))?;

        if update.status.is_up() {
            endpoint.success_count = endpoint.success_count.saturating_add(1);
            endpoint.last_used = Some(update.checked_at);
        }

        let record = update.clone().into_record();
        state.monitors.insert(
            (update.endpoint_id, update.logical_path.clone()),
            record.clone(),
        );

        Ok(record)
    }

    fn list_monitors(&self) -> Result<Vec<MonitorRecord>, StoreError> {
        Ok(self.read()?.monitors.values().cloned().collect())
    }
}
