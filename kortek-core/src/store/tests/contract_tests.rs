//! Behaviour every `EndpointStore` implementation must share.

use crate::endpoint::{EndpointId, NewEndpoint};
use crate::monitor::{MonitorStatus, MonitorUpdate};
use crate::store::{EndpointStore, MemoryStore, StoreError};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

fn stores() -> Vec<(&'static str, Box<dyn EndpointStore>)> {
    let mut stores: Vec<(&'static str, Box<dyn EndpointStore>)> =
        vec![("memory", Box::new(MemoryStore::new()))];

    #[cfg(feature = "sqlite")]
    stores.push((
        "sqlite",
        Box::new(crate::store::SqliteStore::open_in_memory().unwrap()),
    ));

    stores
}

fn update(id: EndpointId, path: &str, status: MonitorStatus) -> MonitorUpdate {
    MonitorUpdate {
        endpoint_id: id,
        logical_path: path.to_string(),
        status,
        response_time_ms: Some(42),
        error_message: None,
        response_snippet: Some("{\"ok\":true}".to_string()),
        checked_at: Utc::now(),
    }
}

#[test]
fn insert_assigns_ids_and_round_trips_fields() {
    for (kind, store) in stores() {
        // Arrange
        let now = Utc::now();
        let new = NewEndpoint::new("Primary", "https://a.test/api/v1", 100)
            .with_source_domain("a.test");

        // Act
        let first = store.insert_endpoint(&new, now).unwrap();
        let second = store
            .insert_endpoint(&NewEndpoint::new("Backup", "https://b.test", 5).inactive(), now)
            .unwrap();

        // Assert
        assert_ne!(first.id, second.id, "{kind}");
        let loaded = store.get_endpoint(first.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Primary", "{kind}");
        assert_eq!(loaded.source_domain, "a.test", "{kind}");
        assert_eq!(loaded.priority, 100, "{kind}");
        assert!(loaded.active, "{kind}");
        assert_eq!(loaded.success_count, 0, "{kind}");
        assert_eq!(store.list_endpoints().unwrap().len(), 2, "{kind}");
        assert!(!store.get_endpoint(second.id).unwrap().unwrap().active, "{kind}");
    }
}

#[test]
fn save_updates_admin_fields_but_not_counters() {
    for (kind, store) in stores() {
        // Arrange
        let now = Utc::now();
        let created = store
            .insert_endpoint(&NewEndpoint::new("Primary", "https://a.test", 10), now)
            .unwrap();
        store
            .upsert_monitor(&update(created.id, "home", MonitorStatus::Up))
            .unwrap();

        // Act
        let mut edited = created.clone();
        edited.priority = 1;
        edited.active = false;
        edited.updated_at = now + Duration::seconds(5);
        let saved = store.save_endpoint(&edited).unwrap();

        // Assert
        assert!(saved, "{kind}");
        let loaded = store.get_endpoint(created.id).unwrap().unwrap();
        assert_eq!(loaded.priority, 1, "{kind}");
        assert!(!loaded.active, "{kind}");
        assert_eq!(loaded.success_count, 1, "{kind}");
    }
}

#[test]
fn save_reports_missing_endpoint() {
    for (kind, store) in stores() {
        let ghost = store
            .insert_endpoint(&NewEndpoint::new("Ghost", "https://g.test", 1), Utc::now())
            .unwrap();
        store.delete_endpoint(ghost.id).unwrap();

        assert!(!store.save_endpoint(&ghost).unwrap(), "{kind}");
    }
}

#[test]
fn monitor_upsert_keeps_one_record_per_path() {
    for (kind, store) in stores() {
        // Arrange
        let endpoint = store
            .insert_endpoint(&NewEndpoint::new("Primary", "https://a.test", 10), Utc::now())
            .unwrap();

        // Act
        store
            .upsert_monitor(&update(endpoint.id, "home", MonitorStatus::Down))
            .unwrap();
        store
            .upsert_monitor(&update(endpoint.id, "home", MonitorStatus::Up))
            .unwrap();
        store
            .upsert_monitor(&update(endpoint.id, "movie", MonitorStatus::Timeout))
            .unwrap();

        // Assert
        let monitors = store.list_monitors().unwrap();
        assert_eq!(monitors.len(), 2, "{kind}");
        let home = monitors.iter().find(|m| m.logical_path == "home").unwrap();
        assert_eq!(home.status, MonitorStatus::Up, "{kind}");
        assert_eq!(home.response_time_ms, Some(42), "{kind}");
    }
}

#[test]
fn up_monitor_bumps_success_counter_and_last_used() {
    for (kind, store) in stores() {
        // Arrange
        let endpoint = store
            .insert_endpoint(&NewEndpoint::new("Primary", "https://a.test", 10), Utc::now())
            .unwrap();

        // Act
        store
            .upsert_monitor(&update(endpoint.id, "home", MonitorStatus::Up))
            .unwrap();
        store
            .upsert_monitor(&update(endpoint.id, "home", MonitorStatus::Error))
            .unwrap();
        store
            .upsert_monitor(&update(endpoint.id, "search", MonitorStatus::Up))
            .unwrap();

        // Assert
        let loaded = store.get_endpoint(endpoint.id).unwrap().unwrap();
        assert_eq!(loaded.success_count, 2, "{kind}");
        assert!(loaded.last_used.is_some(), "{kind}");
    }
}

#[test]
fn monitor_for_unknown_endpoint_is_rejected() {
    for (kind, store) in stores() {
        let result = store.upsert_monitor(&update(EndpointId(404), "home", MonitorStatus::Up));

        assert!(
            matches!(result, Err(StoreError::UnknownEndpoint(EndpointId(404)))),
            "{kind}"
        );
    }
}

#[test]
fn delete_cascades_to_monitor_records() {
    for (kind, store) in stores() {
        // Arrange
        let keep = store
            .insert_endpoint(&NewEndpoint::new("Keep", "https://k.test", 1), Utc::now())
            .unwrap();
        let doomed = store
            .insert_endpoint(&NewEndpoint::new("Drop", "https://d.test", 2), Utc::now())
            .unwrap();
        store
            .upsert_monitor(&update(keep.id, "home", MonitorStatus::Up))
            .unwrap();
        store
            .upsert_monitor(&update(doomed.id, "home", MonitorStatus::Down))
            .unwrap();

        // Act
        let removed = store.delete_endpoint(doomed.id).unwrap();
        let removed_again = store.delete_endpoint(doomed.id).unwrap();

        // Assert
        assert!(removed, "{kind}");
        assert!(!removed_again, "{kind}");
        let monitors = store.list_monitors().unwrap();
        assert_eq!(monitors.len(), 1, "{kind}");
        assert_eq!(monitors[0].endpoint_id, keep.id, "{kind}");
    }
}

#[cfg(feature = "sqlite")]
#[test]
fn sqlite_store_persists_across_reopen() {
    use crate::store::SqliteStore;
    use tempfile::tempdir;

    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("kortek.db");
    let id = {
        let store = SqliteStore::open(&path).unwrap();
        let endpoint = store
            .insert_endpoint(&NewEndpoint::new("Primary", "https://a.test", 10), Utc::now())
            .unwrap();
        store
            .upsert_monitor(&update(endpoint.id, "home", MonitorStatus::Up))
            .unwrap();
        endpoint.id
    };

    // Act
    let reopened = SqliteStore::open(&path).unwrap();

    // Assert
    let endpoint = reopened.get_endpoint(id).unwrap().unwrap();
    assert_eq!(endpoint.success_count, 1);
    assert_eq!(reopened.list_monitors().unwrap().len(), 1);
}
