use crate::cache::{
    ENDPOINT_INFO_KEY, ENDPOINTS_KEY, MemoryCache, SOURCE_DOMAIN_KEY, SharedCache,
    purge_endpoint_class,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

#[test]
fn set_then_get_returns_value() {
    let cache = MemoryCache::new();

    cache.set("k", json!({"a": 1}), None);

    assert_eq!(cache.get("k"), Some(json!({"a": 1})));
    assert_eq!(cache.get("missing"), None);
}

#[test]
fn expired_entries_are_not_returned() {
    // Arrange
    let cache = MemoryCache::new();
    cache.set("short", json!(1), Some(Duration::from_millis(0)));
    cache.set("long", json!(2), Some(Duration::from_secs(60)));

    // Act
    let short = cache.get("short");
    let long = cache.get("long");

    // Assert
    assert_eq!(short, None);
    assert_eq!(long, Some(json!(2)));
    assert_eq!(cache.len(), 1);
}

#[test]
fn purge_endpoint_class_leaves_unrelated_keys() {
    // Arrange
    let cache = MemoryCache::new();
    cache.set(ENDPOINTS_KEY, json!([]), None);
    cache.set(SOURCE_DOMAIN_KEY, json!("a.test"), None);
    cache.set(ENDPOINT_INFO_KEY, json!({}), None);
    cache.set("page:home", json!("rendered"), None);

    // Act
    purge_endpoint_class(&cache);

    // Assert
    assert_eq!(cache.get(ENDPOINTS_KEY), None);
    assert_eq!(cache.get(SOURCE_DOMAIN_KEY), None);
    assert_eq!(cache.get(ENDPOINT_INFO_KEY), None);
    assert_eq!(cache.get("page:home"), Some(json!("rendered")));
}

#[test]
fn clear_drops_everything() {
    let cache = MemoryCache::new();
    cache.set("a", json!(1), None);
    cache.set("b", json!(2), None);

    cache.clear();

    assert!(cache.is_empty());
}
