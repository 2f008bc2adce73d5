use crate::cache::SharedCache;
use crate::fallback::{FallbackError, HopFailure};
use crate::monitor::MonitorStatus;
use crate::response::Rejection;
use crate::store::EndpointStore;
use crate::test_support::{Reply, ScriptedTransport, default_endpoint, fixture};
use crate::transport::TransportError;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

use super::orchestrator;

fn statuses(fx: &crate::test_support::Fixture) -> HashMap<String, MonitorStatus> {
    let names: HashMap<_, _> = fx
        .registry
        .list_all()
        .unwrap()
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();
    fx.store
        .list_monitors()
        .unwrap()
        .into_iter()
        .map(|r| (names[&r.endpoint_id].clone(), r.status))
        .collect()
}

#[tokio::test]
async fn last_candidate_succeeds_after_earlier_failures() {
    // Arrange
    let fx = fixture(None);
    fx.add("first", "https://one.test/api/v1", 30);
    fx.add("second", "https://two.test/api/v1", 20);
    let third = fx.add("third", "https://three.test/api/v1", 10);

    let transport = ScriptedTransport::new();
    transport.route("https://one.test/api/v1/home", Reply::Json(500, json!({})));
    transport.route(
        "https://two.test/api/v1/home",
        Reply::Fail(TransportError::Timeout(Duration::from_secs(1))),
    );
    transport.route("https://three.test/api/v1/home", Reply::Json(200, json!({"items": [1]})));
    let engine = orchestrator(&fx, transport.clone());

    // Act
    let payload = engine.get("home", Vec::new()).await.unwrap();

    // Assert
    assert_eq!(payload, json!({"items": [1]}));
    let statuses = statuses(&fx);
    assert_eq!(statuses["first"], MonitorStatus::Down);
    assert_eq!(statuses["second"], MonitorStatus::Timeout);
    assert_eq!(statuses["third"], MonitorStatus::Up);
    assert_eq!(fx.reload(&third).success_count, 1);
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn all_failing_candidates_exhaust() {
    // Arrange
    let fx = fixture(Some(default_endpoint()));
    fx.add("a", "https://a.test", 3);
    fx.add("b", "https://b.test", 2);
    fx.add("c", "https://c.test", 1);

    let transport = ScriptedTransport::new();
    transport.route("https://a.test/home", Reply::Json(503, json!({})));
    transport.route("https://b.test/home", Reply::Raw(200, "not json".to_string()));
    let engine = orchestrator(&fx, transport.clone());

    // Act
    let err = engine.get("home", Vec::new()).await.unwrap_err();

    // Assert
    let FallbackError::Exhausted { path, attempts } = err else {
        panic!("expected exhaustion");
    };
    assert_eq!(path, "home");
    let tried: Vec<&str> = attempts.iter().map(|a| a.endpoint.as_str()).collect();
    assert_eq!(tried, vec!["a", "b", "c"]);

    let statuses = statuses(&fx);
    assert_eq!(statuses.len(), 3);
    assert!(statuses.values().all(|s| !s.is_up()));
}

#[tokio::test]
async fn shared_cache_is_purged_before_next_candidate() {
    // Arrange
    let fx = fixture(None);
    fx.add("a", "https://a.test", 2);
    fx.add("b", "https://b.test", 1);
    fx.cache.set("page:home", json!("<html>stale</html>"), None);

    let transport = ScriptedTransport::new();
    transport.route("https://a.test/home", Reply::Json(500, json!({})));
    transport.route("https://b.test/home", Reply::Json(200, json!({"ok": true})));
    transport.watch_cache_key(fx.cache.clone(), "page:home");
    let engine = orchestrator(&fx, transport.clone());

    // Act
    engine.get("home", Vec::new()).await.unwrap();

    // Assert
    assert_eq!(transport.observed(), vec![true, false]);
    assert!(fx.cache.get("page:home").is_none());
}

#[tokio::test]
async fn higher_priority_down_endpoint_falls_through_to_backup() {
    // Arrange
    let fx = fixture(None);
    fx.add("A", "https://a.test/api/v1", 100);
    fx.add("B", "https://b.test/api/v1", 50);

    let transport = ScriptedTransport::new();
    transport.route(
        "https://a.test/api/v1/home",
        Reply::Fail(TransportError::Connect("connection refused".to_string())),
    );
    transport.route(
        "https://b.test/api/v1/home",
        Reply::Json(200, json!({"server_id": "B", "latest": [{"title": "x"}]})),
    );
    let engine = orchestrator(&fx, transport);

    // Act
    let payload = engine.get("home", Vec::new()).await.unwrap();

    // Assert
    assert_eq!(payload["server_id"], "B");
    let statuses = statuses(&fx);
    assert!(!statuses["A"].is_up());
    assert_eq!(statuses["B"], MonitorStatus::Up);
}

#[tokio::test]
async fn low_confidence_single_endpoint_exhausts() {
    let fx = fixture(None);
    fx.add("only", "https://only.test", 1);
    let transport = ScriptedTransport::new();
    transport.route(
        "https://only.test/home",
        Reply::Json(200, json!({"confidence_score": 0.3, "data": {"x": 1}})),
    );
    let engine = orchestrator(&fx, transport);

    let err = engine.get("home", Vec::new()).await.unwrap_err();

    let FallbackError::Exhausted { attempts, .. } = err else {
        panic!("expected exhaustion");
    };
    assert_eq!(attempts.len(), 1);
    assert!(matches!(
        attempts[0].failure,
        HopFailure::LowConfidence(Rejection::LowConfidence { .. })
    ));
}

#[tokio::test]
async fn empty_registry_uses_default_endpoint() {
    // Arrange
    let fx = fixture(Some(default_endpoint()));
    let transport = ScriptedTransport::new();
    transport.route(
        "http://localhost:8001/api/v1/home",
        Reply::Json(200, json!({"confidence_score": 1.0, "data": {"x": 1}})),
    );
    let engine = orchestrator(&fx, transport);

    // Act
    let payload = engine.get("home", Vec::new()).await.unwrap();
    let info = engine.current_endpoint_info().unwrap();

    // Assert
    assert_eq!(payload, json!({"x": 1}));
    assert!(info.is_default);
    assert!(fx.store.list_monitors().unwrap().is_empty());
}

#[tokio::test]
async fn no_candidates_fails_without_dispatching() {
    let fx = fixture(None);
    let transport = ScriptedTransport::new();
    let engine = orchestrator(&fx, transport.clone());

    let err = engine.get("home", Vec::new()).await.unwrap_err();

    assert!(matches!(err, FallbackError::NoCandidates));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn bypass_flag_is_sent_on_retries_only() {
    // Arrange
    let fx = fixture(None);
    fx.add("a", "https://a.test", 2);
    fx.add("b", "https://b.test", 1);
    let transport = ScriptedTransport::new();
    transport.route("https://a.test/search", Reply::Json(200, json!({})));
    transport.route("https://b.test/search", Reply::Json(200, json!({"results": [1]})));
    let engine = orchestrator(&fx, transport.clone());

    // Act
    engine
        .get("search", vec![("query".to_string(), "one piece".to_string())])
        .await
        .unwrap();

    // Assert
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(!requests[0].query.iter().any(|(k, _)| k == "force_refresh"));
    assert!(
        requests[1]
            .query
            .contains(&("force_refresh".to_string(), "true".to_string()))
    );
}

#[tokio::test]
async fn post_calls_fall_back_too() {
    let fx = fixture(None);
    fx.add("a", "https://a.test", 2);
    fx.add("b", "https://b.test", 1);
    let transport = ScriptedTransport::new();
    transport.route("https://b.test/report", Reply::Json(200, json!({"accepted": true})));
    let engine = orchestrator(&fx, transport.clone());

    let payload = engine.post("report", Some(json!({"id": 1}))).await.unwrap();

    assert_eq!(payload, json!({"accepted": true}));
    assert_eq!(
        transport.requests()[1].body,
        Some(json!({"id": 1, "force_refresh": true}))
    );
}

#[tokio::test]
async fn concurrent_calls_keep_independent_cursors() {
    // Arrange
    let fx = fixture(None);
    fx.add("a", "https://a.test", 2);
    fx.add("b", "https://b.test", 1);
    let transport = ScriptedTransport::new();
    transport.route("https://b.test/home", Reply::Json(200, json!({"page": "home"})));
    transport.route("https://b.test/movie", Reply::Json(200, json!({"page": "movie"})));
    let engine = orchestrator(&fx, transport.clone());

    // Act
    let (home, movie) = tokio::join!(
        engine.get("home", Vec::new()),
        engine.get("movie", Vec::new())
    );

    // Assert
    assert_eq!(home.unwrap(), json!({"page": "home"}));
    assert_eq!(movie.unwrap(), json!({"page": "movie"}));
    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls.iter().filter(|u| u.starts_with("https://a.test")).count(), 2);
    assert_eq!(urls.iter().filter(|u| u.starts_with("https://b.test")).count(), 2);
}
