use integration_tests::harness::{
    CannedResponse, TestEngine, TestUpstream, captured_events, free_port,
};
use kortek_core::fallback::FallbackError;
use kortek_core::monitor::MonitorStatus;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn falls_back_from_failing_to_healthy_upstream() {
    // Arrange
    let primary = TestUpstream::start();
    primary.route("/api/v1/home", CannedResponse::json(500, json!({"error": "boom"})));
    let backup = TestUpstream::start();
    backup.route(
        "/api/v1/home",
        CannedResponse::json(200, json!({"confidence_score": 0.9, "data": {"latest": ["ep-1"]}})),
    );

    let t = TestEngine::start(|_| {});
    t.add("it-primary", &format!("{}/api/v1", primary.base_url()), 100);
    t.add("it-backup", &format!("{}/api/v1", backup.base_url()), 50);

    // Act
    let payload = t.engine.orchestrator.get("home", Vec::new()).await.unwrap();

    // Assert
    assert_eq!(payload, json!({"latest": ["ep-1"]}));
    assert_eq!(primary.requests_to("/api/v1/home")[0].query, None);
    assert_eq!(
        backup.requests_to("/api/v1/home")[0].query.as_deref(),
        Some("force_refresh=true")
    );

    let summary = t.engine.recorder.summary().unwrap();
    let statuses: Vec<(String, MonitorStatus)> = summary
        .endpoints
        .iter()
        .map(|e| (e.name.clone(), e.paths[0].status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("it-primary".to_string(), MonitorStatus::Down),
            ("it-backup".to_string(), MonitorStatus::Up),
        ]
    );

    let hop = captured_events()
        .into_iter()
        .find(|e| e.name() == Some("fallback_hop_failed") && e.field("endpoint") == Some("it-primary"));
    assert!(hop.is_some(), "hop failure should be logged");
}

#[tokio::test]
async fn slow_upstream_times_out_and_next_one_answers() {
    // Arrange
    let slow = TestUpstream::start();
    slow.route(
        "/movie",
        CannedResponse::json(200, json!({"movies": [1]})).delayed(Duration::from_millis(1_500)),
    );
    let fast = TestUpstream::start();
    fast.route("/movie", CannedResponse::json(200, json!({"movies": [2]})));

    let t = TestEngine::start(|cfg| cfg.engine.read_timeout_ms = 300);
    t.add("it-slow", &slow.base_url(), 10);
    t.add("it-fast", &fast.base_url(), 5);

    // Act
    let payload = t.engine.orchestrator.get("movie", Vec::new()).await.unwrap();

    // Assert
    assert_eq!(payload, json!({"movies": [2]}));
    let summary = t.engine.recorder.summary().unwrap();
    assert_eq!(summary.status_counts.timeout, 1);
    assert_eq!(summary.status_counts.up, 1);
}

#[tokio::test]
async fn unreachable_and_low_quality_upstreams_exhaust() {
    // Arrange
    let weak = TestUpstream::start();
    weak.route(
        "/search",
        CannedResponse::json(200, json!({"confidence_score": 0.3, "data": {"results": [1]}})),
    );
    let t = TestEngine::start(|_| {});
    t.add("it-weak", &weak.base_url(), 10);
    t.add("it-gone", &format!("http://127.0.0.1:{}", free_port()), 5);

    // Act
    let err = t
        .engine
        .orchestrator
        .get("search", vec![("query".to_string(), "naruto".to_string())])
        .await
        .unwrap_err();

    // Assert
    let FallbackError::Exhausted { path, attempts } = err else {
        panic!("expected exhaustion");
    };
    assert_eq!(path, "search");
    assert_eq!(attempts.len(), 2);
    assert_eq!(weak.requests_to("/search")[0].query.as_deref(), Some("query=naruto"));

    let summary = t.engine.recorder.summary().unwrap();
    assert_eq!(summary.status_counts.up, 0);
    assert_eq!(summary.status_counts.error, 1);
    assert_eq!(summary.status_counts.down, 1);
}

#[tokio::test]
async fn post_retry_carries_flag_in_body() {
    // Arrange
    let broken = TestUpstream::start();
    broken.route("/report", CannedResponse::raw(200, "<html>oops</html>"));
    let good = TestUpstream::start();
    good.route("/report", CannedResponse::json(200, json!({"accepted": true})));

    let t = TestEngine::start(|_| {});
    t.add("it-broken", &broken.base_url(), 2);
    t.add("it-good", &good.base_url(), 1);

    // Act
    let payload = t
        .engine
        .orchestrator
        .post("report", Some(json!({"episode": 12})))
        .await
        .unwrap();

    // Assert
    assert_eq!(payload, json!({"accepted": true}));
    let first: serde_json::Value = serde_json::from_str(&broken.requests()[0].body).unwrap();
    let retry: serde_json::Value = serde_json::from_str(&good.requests()[0].body).unwrap();
    assert_eq!(first, json!({"episode": 12}));
    assert_eq!(retry, json!({"episode": 12, "force_refresh": true}));
    assert_eq!(good.requests()[0].method, "POST");
}

#[tokio::test]
async fn default_endpoint_serves_an_empty_registry() {
    // Arrange
    let fallback = TestUpstream::start();
    fallback.route("/api/v1/home", CannedResponse::json(200, json!({"home": true})));
    let url = format!("{}/api/v1", fallback.base_url());
    let t = TestEngine::start(|cfg| {
        cfg.default_endpoint.enable = true;
        cfg.default_endpoint.url = url;
    });

    // Act
    let payload = t.engine.orchestrator.get("home", Vec::new()).await.unwrap();
    let info = t.engine.orchestrator.current_endpoint_info().unwrap();

    // Assert
    assert_eq!(payload, json!({"home": true}));
    assert!(info.is_default);
    assert_eq!(t.engine.recorder.summary().unwrap().total_endpoints, 0);
}
