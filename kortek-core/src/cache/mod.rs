mod memory;

#[cfg(test)]
mod tests;

pub use memory::MemoryCache;

use serde_json::Value;
use std::time::Duration;

/// Cached candidate-list snapshot.
pub const ENDPOINTS_KEY: &str = "api_endpoints";
/// Cached source domain of the authoritative endpoint.
pub const SOURCE_DOMAIN_KEY: &str = "current_source_domain";
/// Cached [`crate::endpoint::EndpointInfo`] of the authoritative endpoint.
pub const ENDPOINT_INFO_KEY: &str = "current_endpoint_info";

/// Every key whose value is derived from whichever endpoint is currently authoritative.
pub const ENDPOINT_CLASS: [&str; 3] = [ENDPOINTS_KEY, SOURCE_DOMAIN_KEY, ENDPOINT_INFO_KEY];

/// Cache shared between the engine and its consumers. Values only need to be
/// eventually visible to the next request.
pub trait SharedCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value, ttl: Option<Duration>);

    fn delete(&self, key: &str);

    /// Drops every entry, including keys written by consumers.
    fn clear(&self);
}

/// Purges the endpoint-derived cache class.
pub fn purge_endpoint_class(cache: &dyn SharedCache) {
    for key in ENDPOINT_CLASS {
        cache.delete(key);
    }
}
