#![allow(dead_code)]

use std::sync::Arc;

use psylink_core::storage_keys;
use psylink_storage::error::StorageError;
use psylink_storage::{KeyValueStore, MemoryStore, SharedStore};

/// A memory store that refuses writes to one key.
pub struct FailingStore {
    pub inner: MemoryStore,
    pub fail_key: &'static str,
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == self.fail_key {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
            });
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.inner.keys()
    }
}

/// A store with every snapshot-tracked key populated.
pub fn seeded_store() -> SharedStore {
    let store = MemoryStore::new();
    seed(&store);
    Arc::new(store)
}

pub fn seed(store: &dyn KeyValueStore) {
    let entries = [
        (
            storage_keys::LINKS,
            r#"[{"id":"l1","url":"https://psy.example.com/test/l1","questionnaireType":"SCL-90","status":"unused","createdAt":"2024-03-01T00:00:00Z"}]"#,
        ),
        (
            storage_keys::CUSTOM_USERS,
            r#"[{"id":"u1","username":"counselor","role":"admin"}]"#,
        ),
        (
            storage_keys::QUESTION_TYPES,
            r#"[{"id":"SCL-90","name":"症状自评量表"}]"#,
        ),
        (
            storage_keys::PUBLISH_STATE,
            r#"{"SCL-90":{"published":true,"publishedAt":"2024-03-02T08:00:00Z"}}"#,
        ),
        (
            storage_keys::IMPORT_HISTORY,
            r#"[{"id":"h1","fileName":"scl90.xlsx","count":90}]"#,
        ),
        (
            storage_keys::AUDIT_LOGS,
            r#"[{"id":"log_1","userId":"admin","username":"admin","action":"login","target":"system","targetType":"system","timestamp":"2024-03-01T00:00:00Z"}]"#,
        ),
    ];
    for (key, value) in entries {
        store.set(key, value).unwrap();
    }
}
