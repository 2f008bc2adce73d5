mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(test)]
mod tests;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use crate::endpoint::{EndpointId, NewEndpoint, PersistedEndpoint};
use crate::monitor::{MonitorRecord, MonitorUpdate};
use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt value '{value}' in column '{column}'")]
    Corrupt { column: &'static str, value: String },

    #[error("unknown endpoint {0}")]
    UnknownEndpoint(EndpointId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable home of endpoints and their monitor records.
///
/// `success_count` and `last_used` are owned by [`EndpointStore::upsert_monitor`];
/// [`EndpointStore::save_endpoint`] never overwrites them.
///
/// Methods are synchronous and may block on a lock or on disk. Per-request
/// monitor writes go through [`MonitorRecorder::record_blocking`], which runs
/// them on tokio's blocking pool; registry reads are served from the cache.
///
/// [`MonitorRecorder::record_blocking`]: crate::monitor::MonitorRecorder::record_blocking
pub trait EndpointStore: Send + Sync {
    /// All endpoints, active or not, in no particular order.
    fn list_endpoints(&self) -> Result<Vec<PersistedEndpoint>, StoreError>;

    fn get_endpoint(&self, id: EndpointId) -> Result<Option<PersistedEndpoint>, StoreError>;

    fn insert_endpoint(
        &self,
        new: &NewEndpoint,
        now: DateTime<Utc>,
    ) -> Result<PersistedEndpoint, StoreError>;

    /// Writes the administrative fields. Returns `false` when the endpoint does not exist.
    fn save_endpoint(&self, endpoint: &PersistedEndpoint) -> Result<bool, StoreError>;

    /// Deletes the endpoint and its monitor records. Returns `false` when it did not exist.
    fn delete_endpoint(&self, id: EndpointId) -> Result<bool, StoreError>;

    /// Creates or replaces the record for `(endpoint_id, logical_path)`.
    fn upsert_monitor(&self, update: &MonitorUpdate) -> Result<MonitorRecord, StoreError>;

    fn list_monitors(&self) -> Result<Vec<MonitorRecord>, StoreError>;
}
