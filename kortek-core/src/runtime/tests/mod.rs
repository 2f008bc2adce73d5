use crate::cache::MemoryCache;
use crate::conf::{EndpointSeedConfig, KortekConfig};
use crate::runtime::{Engine, RuntimeError};
use crate::store::MemoryStore;
use crate::test_support::{Reply, ScriptedTransport};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn seed(name: &str, url: &str, priority: i32) -> EndpointSeedConfig {
    EndpointSeedConfig {
        name: name.to_string(),
        url: url.to_string(),
        source_domain: String::new(),
        priority,
        active: true,
    }
}

#[tokio::test]
async fn assembled_engine_seeds_and_serves() {
    // Arrange
    let cfg = KortekConfig {
        endpoints: vec![
            seed("primary", "https://a.test/api/v1", 10),
            seed("backup", "https://b.test/api/v1", 1),
        ],
        ..KortekConfig::default()
    };
    let transport = ScriptedTransport::new();
    transport.route("https://b.test/api/v1/movie", Reply::Json(200, json!({"movies": [1]})));

    // Act
    let engine = Engine::assemble(
        &cfg,
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryCache::new()),
        transport.clone(),
    )
    .unwrap();
    let payload = engine.orchestrator.get("movie", Vec::new()).await.unwrap();

    // Assert
    assert_eq!(payload, json!({"movies": [1]}));
    assert_eq!(engine.registry.list_all().unwrap().len(), 2);
    assert_eq!(transport.requests()[0].timeout, cfg.engine.read_timeout());
    let summary = engine.recorder.summary().unwrap();
    assert_eq!(summary.status_counts.up, 1);
    assert_eq!(summary.status_counts.down, 1);
}

#[test]
fn disabled_default_endpoint_leaves_no_candidates() {
    let mut cfg = KortekConfig::default();
    cfg.default_endpoint.enable = false;

    let engine = Engine::assemble(
        &cfg,
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryCache::new()),
        ScriptedTransport::new(),
    )
    .unwrap();

    assert!(engine.registry.current_endpoint_info().is_none());
}

#[test]
fn invalid_default_endpoint_is_reported() {
    let mut cfg = KortekConfig::default();
    cfg.default_endpoint.url = "localhost:8001".to_string();

    let result = Engine::assemble(
        &cfg,
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryCache::new()),
        ScriptedTransport::new(),
    );

    assert!(matches!(result, Err(RuntimeError::DefaultEndpoint(_))));
}

#[cfg(feature = "sqlite")]
#[test]
fn configured_database_persists_between_engines() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = KortekConfig::default();
    cfg.registry.database = Some(dir.path().join("kortek.db"));
    cfg.endpoints = vec![seed("primary", "https://a.test", 1)];

    // Act
    crate::runtime::build_engine(&cfg).unwrap();
    cfg.endpoints = vec![seed("other", "https://b.test", 1)];
    let reopened = crate::runtime::build_engine(&cfg).unwrap();

    // Assert
    let names: Vec<String> = reopened
        .registry
        .list_all()
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["primary".to_string()]);
}
