use std::sync::Arc;

use psylink_audit::{AuditEvent, AuditLog, AuditQuery};
use psylink_core::models::audit::TargetType;
use psylink_core::storage_keys;
use psylink_storage::{ChangeBus, ChangeDomain, KeyValueStore, MemoryStore, SharedStore};

fn setup() -> (SharedStore, ChangeBus, AuditLog) {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let bus = ChangeBus::new();
    let log = AuditLog::new(store.clone(), bus.clone());
    (store, bus, log)
}

#[test]
fn record_prepends_and_notifies() {
    let (_store, bus, log) = setup();
    let mut rx = bus.subscribe();

    log.record(AuditEvent::new("创建备份", "weekly", TargetType::System, "admin"))
        .unwrap();
    log.record(AuditEvent::new("批量导入链接", "links.csv", TargetType::Link, "admin"))
        .unwrap();

    let entries = log.load();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "批量导入链接");
    assert_eq!(entries[1].target, "weekly");
    assert_eq!(rx.try_recv().unwrap(), ChangeDomain::AuditLogs);
}

#[test]
fn query_filters_compose() {
    let (_store, _bus, log) = setup();
    log.record(AuditEvent::new("恢复备份", "b1", TargetType::System, "alice"))
        .unwrap();
    log.record(AuditEvent::new("批量导入链接", "f.csv", TargetType::Link, "bob"))
        .unwrap();
    log.record(AuditEvent::new("删除备份", "b2", TargetType::System, "alice"))
        .unwrap();

    let alice_system = log.query(&AuditQuery {
        user_id: Some("alice".into()),
        target_type: Some(TargetType::System),
        ..Default::default()
    });
    assert_eq!(alice_system.len(), 2);

    let backups = log.query(&AuditQuery {
        action: Some("备份".into()),
        limit: Some(1),
        ..Default::default()
    });
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].target, "b2");
}

#[test]
fn foreign_entries_survive_a_new_record() {
    let (store, _bus, log) = setup();
    store
        .set(storage_keys::AUDIT_LOGS, r#"[{"legacy":true}]"#)
        .unwrap();

    log.record(AuditEvent::new("x", "y", TargetType::Other, "u")).unwrap();

    assert_eq!(log.load().len(), 1);
    let raw: Vec<serde_json::Value> =
        serde_json::from_str(&store.get(storage_keys::AUDIT_LOGS).unwrap().unwrap()).unwrap();
    assert_eq!(raw.len(), 2);
    assert_eq!(raw[1]["legacy"], true);
}

#[test]
fn clear_removes_the_key() {
    let (store, _bus, log) = setup();
    log.record(AuditEvent::new("x", "y", TargetType::Other, "u")).unwrap();
    log.clear().unwrap();
    assert_eq!(store.get(storage_keys::AUDIT_LOGS).unwrap(), None);
    assert!(log.load().is_empty());
}
