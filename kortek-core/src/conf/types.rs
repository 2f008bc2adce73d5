use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level `kortek.hcl`. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KortekConfig {
    pub engine: EngineConfig,
    pub health: HealthConfig,
    pub registry: RegistryConfig,
    pub default_endpoint: DefaultEndpointConfig,
    pub monitor: MonitorConfig,
    /// Endpoints inserted into an empty registry on startup.
    pub endpoints: Vec<EndpointSeedConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    /// Responses declaring a confidence strictly below this are rejected.
    pub confidence_threshold: f64,
    /// Flag attached to retried requests so the next provider skips its own cache.
    pub bypass_cache_param: String,
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 3_000,
            read_timeout_ms: 10_000,
            confidence_threshold: 0.5,
            bypass_cache_param: "force_refresh".to_string(),
            user_agent: "Kortek Fallback Client".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Liveness path appended to the endpoint's service root.
    pub path: String,
    pub timeout_ms: u64,
    /// Consecutive failed probes before a sweep deactivates an endpoint.
    pub failure_threshold: u32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            path: "health".to_string(),
            timeout_ms: 5_000,
            failure_threshold: 3,
        }
    }
}

impl HealthConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// SQLite database file. The registry lives in memory when unset.
    pub database: Option<PathBuf>,
    pub snapshot_ttl_seconds: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            database: None,
            snapshot_ttl_seconds: 300,
        }
    }
}

impl RegistryConfig {
    pub fn snapshot_ttl(&self) -> Duration {
        Duration::from_secs(self.snapshot_ttl_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultEndpointConfig {
    pub enable: bool,
    pub name: String,
    pub url: String,
    pub source_domain: String,
}

impl Default for DefaultEndpointConfig {
    fn default() -> Self {
        Self {
            enable: true,
            name: "Default".to_string(),
            url: "http://localhost:8001/api/v1".to_string(),
            source_domain: "gomunime.co".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Logical paths exercised by a status check.
    pub paths: Vec<String>,
    /// Query sent with the `search` path during status checks.
    pub search_query: String,
    pub snippet_limit: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            paths: ["home", "anime-terbaru", "movie", "jadwal-rilis", "search"]
                .into_iter()
                .map(String::from)
                .collect(),
            search_query: "test".to_string(),
            snippet_limit: crate::monitor::SNIPPET_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointSeedConfig {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub source_domain: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
