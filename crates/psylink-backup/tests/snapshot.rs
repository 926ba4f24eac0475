mod common;

use std::sync::Arc;

use psylink_backup::SnapshotStore;
use psylink_backup::error::BackupError;
use psylink_core::storage_keys;
use psylink_storage::{ChangeBus, ChangeDomain, KeyValueStore, MemoryStore, SharedStore};

use common::{FailingStore, seed, seeded_store};

fn snapshot(key: &str, store: &SharedStore) -> Option<String> {
    store.get(key).unwrap()
}

#[test]
fn restore_brings_back_every_tracked_key_byte_for_byte() {
    let store = seeded_store();
    let backups = SnapshotStore::new(store.clone(), ChangeBus::new());
    let before: Vec<Option<String>> = storage_keys::SNAPSHOT_KEYS
        .iter()
        .map(|key| snapshot(key, &store))
        .collect();

    let created = backups.create("before cleanup", Some("weekly")).unwrap();
    for key in storage_keys::SNAPSHOT_KEYS {
        store.set(key, "[]").unwrap();
    }

    let outcome = backups.restore(&created.id);

    assert!(outcome.success, "{}", outcome.message);
    let after: Vec<Option<String>> = storage_keys::SNAPSHOT_KEYS
        .iter()
        .map(|key| snapshot(key, &store))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn create_describes_the_snapshot() {
    let backups = SnapshotStore::new(seeded_store(), ChangeBus::new());
    let created = backups.create("nightly", None).unwrap();

    assert!(created.id.starts_with("backup_"));
    assert_eq!(created.version, "1.0");
    assert!(created.size > 0);
    assert_eq!(created.data.links.as_ref().unwrap().len(), 1);
    let questionnaires = created.data.questionnaires.as_ref().unwrap();
    assert!(questionnaires.publish_state.as_ref().unwrap().is_object());
    assert_eq!(backups.get(&created.id), Some(created));
}

#[test]
fn corrupt_collection_is_captured_as_empty() {
    let store = seeded_store();
    store.set(storage_keys::LINKS, "{not json").unwrap();
    store.set(storage_keys::PUBLISH_STATE, "[1,2]").unwrap();
    let backups = SnapshotStore::new(store, ChangeBus::new());

    let created = backups.create("partial", None).unwrap();

    assert_eq!(created.data.links, Some(Vec::new()));
    assert_eq!(created.data.users.as_ref().unwrap().len(), 1);
    let publish_state = created.data.questionnaires.unwrap().publish_state.unwrap();
    assert_eq!(publish_state, serde_json::json!({}));
}

#[test]
fn retention_cap_evicts_the_oldest() {
    let cap = 5;
    let backups = SnapshotStore::with_capacity(seeded_store(), ChangeBus::new(), cap);
    let ids: Vec<String> = (0..=cap)
        .map(|i| backups.create(&format!("b{i}"), None).unwrap().id)
        .collect();

    let listed = backups.list();
    assert_eq!(listed.len(), cap);
    assert_eq!(listed[0].id, ids[cap]);
    assert!(listed.iter().all(|b| b.id != ids[0]));
}

#[test]
fn retention_cap_applies_to_imports() {
    let backups = SnapshotStore::with_capacity(seeded_store(), ChangeBus::new(), 2);
    let first = backups.create("one", None).unwrap();
    backups.create("two", None).unwrap();

    let mut foreign = first.clone();
    foreign.id = "backup_external".to_string();
    let file = SnapshotStore::export_as_file(&foreign).unwrap();
    backups.import_from_file(file.contents.as_bytes()).unwrap();

    let listed = backups.list();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, "backup_external");
    assert!(listed.iter().all(|b| b.id != first.id));
}

#[test]
fn export_then_import_is_identity() {
    let source = SnapshotStore::new(seeded_store(), ChangeBus::new());
    let original = source.create("月度备份", Some("before migration")).unwrap();

    let file = SnapshotStore::export_as_file(&original).unwrap();
    assert!(file.file_name.starts_with("月度备份_"));
    assert!(file.file_name.ends_with(".json"));

    let target: SharedStore = Arc::new(MemoryStore::new());
    let imported = SnapshotStore::new(target, ChangeBus::new())
        .import_from_file(file.contents.as_bytes())
        .unwrap();
    assert_eq!(imported, original);
}

#[test]
fn import_rejects_documents_missing_required_fields() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let backups = SnapshotStore::new(store.clone(), ChangeBus::new());

    let err = backups
        .import_from_file(br#"{"id":"backup_1","data":{}}"#)
        .unwrap_err();
    match err {
        BackupError::InvalidSnapshot(message) => {
            assert!(message.contains("name"));
            assert!(message.contains("timestamp"));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(matches!(
        backups.import_from_file(b"not json"),
        Err(BackupError::InvalidSnapshot(_))
    ));
    assert_eq!(store.get(storage_keys::BACKUPS).unwrap(), None);
}

#[test]
fn unknown_ids_are_reported() {
    let backups = SnapshotStore::new(seeded_store(), ChangeBus::new());
    assert!(backups.get("backup_missing").is_none());
    assert!(!backups.delete("backup_missing").unwrap());

    let outcome = backups.restore("backup_missing");
    assert!(!outcome.success);
    assert!(outcome.message.contains("backup_missing"));
}

#[test]
fn delete_removes_one_snapshot() {
    let backups = SnapshotStore::new(seeded_store(), ChangeBus::new());
    let a = backups.create("a", None).unwrap();
    let b = backups.create("b", None).unwrap();

    assert!(backups.delete(&a.id).unwrap());
    assert_eq!(
        backups.list().into_iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![b.id]
    );
}

#[test]
fn corrupt_backup_list_degrades_to_empty() {
    let store = seeded_store();
    store.set(storage_keys::BACKUPS, "\u{0}garbage").unwrap();
    let backups = SnapshotStore::new(store, ChangeBus::new());

    assert!(backups.list().is_empty());
    assert!(backups.get("anything").is_none());
    backups.create("fresh", None).unwrap();
    assert_eq!(backups.list().len(), 1);
}

#[test]
fn restore_surfaces_write_failures() {
    let failing = FailingStore {
        inner: MemoryStore::new(),
        fail_key: storage_keys::QUESTION_TYPES,
    };
    seed(&failing.inner);
    let store: SharedStore = Arc::new(failing);
    let backups = SnapshotStore::new(store.clone(), ChangeBus::new());
    let created = backups.create("x", None).unwrap();

    let outcome = backups.restore(&created.id);

    assert!(!outcome.success);
    assert!(outcome.message.contains(storage_keys::QUESTION_TYPES));
    assert!(outcome.message.contains(storage_keys::LINKS));
}

#[test]
fn sections_missing_from_a_snapshot_are_left_alone() {
    let store = seeded_store();
    let backups = SnapshotStore::new(store.clone(), ChangeBus::new());
    let document = serde_json::json!({
        "id": "backup_links_only",
        "name": "links only",
        "timestamp": "2024-03-01T00:00:00Z",
        "data": { "links": [] }
    });
    backups
        .import_from_file(document.to_string().as_bytes())
        .unwrap();
    let users_before = store.get(storage_keys::CUSTOM_USERS).unwrap();

    assert!(backups.restore("backup_links_only").success);

    assert_eq!(store.get(storage_keys::LINKS).unwrap().as_deref(), Some("[]"));
    assert_eq!(store.get(storage_keys::CUSTOM_USERS).unwrap(), users_before);
}

#[test]
fn change_signals_follow_mutations() {
    let bus = ChangeBus::new();
    let backups = SnapshotStore::new(seeded_store(), bus.clone());
    let mut rx = bus.subscribe();

    let created = backups.create("signals", None).unwrap();
    assert_eq!(rx.try_recv().unwrap(), ChangeDomain::Backups);

    backups.restore(&created.id);
    let mut seen = Vec::new();
    while let Ok(domain) = rx.try_recv() {
        seen.push(domain);
    }
    assert_eq!(
        seen,
        vec![
            ChangeDomain::Links,
            ChangeDomain::QuestionTypes,
            ChangeDomain::AuditLogs
        ]
    );
}
