use psylink_core::models::snapshot::{
    QuestionnaireBundle, SNAPSHOT_VERSION, Snapshot, SnapshotBundle,
};
use psylink_core::storage_keys;
use psylink_storage::state::{load_or_default, save_state};
use psylink_storage::{ChangeBus, ChangeDomain, KeyValueStore, SharedStore};
use serde::Serialize;
use serde_json::Value;

use crate::error::BackupError;

/// Snapshots kept before the oldest is evicted.
pub const DEFAULT_CAPACITY: usize = 50;

/// Fields a backup file must carry before it is accepted.
const REQUIRED_FIELDS: [&str; 4] = ["id", "name", "timestamp", "data"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreOutcome {
    pub success: bool,
    pub message: String,
}

impl RestoreOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// One snapshot rendered as a downloadable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub contents: String,
}

/// The backup list under `system_backups`, newest first.
#[derive(Clone)]
pub struct SnapshotStore {
    store: SharedStore,
    bus: ChangeBus,
    capacity: usize,
}

impl SnapshotStore {
    pub fn new(store: SharedStore, bus: ChangeBus) -> Self {
        Self::with_capacity(store, bus, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(store: SharedStore, bus: ChangeBus, capacity: usize) -> Self {
        Self {
            store,
            bus,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Capture every tracked collection. A collection that cannot be read is
    /// captured as empty rather than failing the whole snapshot.
    pub fn create(&self, name: &str, description: Option<&str>) -> Result<Snapshot, BackupError> {
        let store = self.store.as_ref();
        let data = SnapshotBundle {
            links: Some(load_or_default(store, storage_keys::LINKS)),
            users: Some(load_or_default(store, storage_keys::CUSTOM_USERS)),
            questionnaires: Some(QuestionnaireBundle {
                custom_types: Some(load_or_default(store, storage_keys::QUESTION_TYPES)),
                publish_state: Some(load_object(store, storage_keys::PUBLISH_STATE)),
                history: Some(load_or_default(store, storage_keys::IMPORT_HISTORY)),
            }),
            audit_logs: Some(load_or_default(store, storage_keys::AUDIT_LOGS)),
        };

        let timestamp = jiff::Timestamp::now();
        let snapshot = Snapshot {
            id: format!(
                "backup_{}_{}",
                timestamp.as_millisecond(),
                &uuid::Uuid::new_v4().simple().to_string()[..8]
            ),
            name: name.to_string(),
            description: description.map(str::to_string),
            timestamp,
            size: serde_json::to_string(&data)?.len(),
            data,
            version: SNAPSHOT_VERSION.to_string(),
        };

        self.insert(&snapshot)?;
        tracing::info!(id = %snapshot.id, name, size = snapshot.size, "backup created");
        Ok(snapshot)
    }

    /// All snapshots, newest first. Entries that no longer parse are skipped.
    pub fn list(&self) -> Vec<Snapshot> {
        self.load_raw()
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable backup entry");
                    None
                }
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Snapshot> {
        self.list().into_iter().find(|snapshot| snapshot.id == id)
    }

    /// Overwrite each live collection the snapshot carries with its captured
    /// value. Sections the snapshot lacks are left alone. A failed write stops
    /// the restore; collections already written stay written.
    pub fn restore(&self, id: &str) -> RestoreOutcome {
        let Some(snapshot) = self.get(id) else {
            return RestoreOutcome::failed(format!("backup not found: {id}"));
        };

        let mut written = Vec::new();
        let result = self.write_sections(&snapshot.data, &mut written);

        let mut domains: Vec<ChangeDomain> = written.iter().map(|&(_, d)| d).collect();
        domains.dedup();
        self.bus.notify_all(&domains);

        match result {
            Ok(()) => {
                tracing::info!(id, name = %snapshot.name, keys = written.len(), "backup restored");
                RestoreOutcome {
                    success: true,
                    message: format!("restored backup '{}'", snapshot.name),
                }
            }
            Err((key, e)) => {
                tracing::error!(id, key, error = %e, "backup restore failed");
                let applied: Vec<&str> = written.iter().map(|&(k, _)| k).collect();
                RestoreOutcome::failed(format!(
                    "restore of '{}' failed writing {key}: {e} (already restored: {})",
                    snapshot.name,
                    if applied.is_empty() {
                        "none".to_string()
                    } else {
                        applied.join(", ")
                    }
                ))
            }
        }
    }

    fn write_sections(
        &self,
        data: &SnapshotBundle,
        written: &mut Vec<(&'static str, ChangeDomain)>,
    ) -> Result<(), (&'static str, BackupError)> {
        let questionnaires = data.questionnaires.as_ref();
        let sections: [(&'static str, ChangeDomain, Option<Value>); 6] = [
            (
                storage_keys::LINKS,
                ChangeDomain::Links,
                data.links.clone().map(Value::Array),
            ),
            (
                storage_keys::CUSTOM_USERS,
                ChangeDomain::Links,
                data.users.clone().map(Value::Array),
            ),
            (
                storage_keys::QUESTION_TYPES,
                ChangeDomain::QuestionTypes,
                questionnaires
                    .and_then(|q| q.custom_types.clone())
                    .map(Value::Array),
            ),
            (
                storage_keys::PUBLISH_STATE,
                ChangeDomain::QuestionTypes,
                questionnaires.and_then(|q| q.publish_state.clone()),
            ),
            (
                storage_keys::IMPORT_HISTORY,
                ChangeDomain::QuestionTypes,
                questionnaires.and_then(|q| q.history.clone()).map(Value::Array),
            ),
            (
                storage_keys::AUDIT_LOGS,
                ChangeDomain::AuditLogs,
                data.audit_logs.clone().map(Value::Array),
            ),
        ];

        for (key, domain, value) in sections {
            let Some(value) = value else { continue };
            save_state(self.store.as_ref(), key, &value).map_err(|e| (key, e.into()))?;
            written.push((key, domain));
        }
        Ok(())
    }

    /// Remove one snapshot. `false` if no snapshot has that id.
    pub fn delete(&self, id: &str) -> Result<bool, BackupError> {
        let mut raw = self.load_raw();
        let before = raw.len();
        raw.retain(|value| value.get("id").and_then(Value::as_str) != Some(id));
        if raw.len() == before {
            return Ok(false);
        }
        self.persist(&raw)?;
        tracing::info!(id, "backup deleted");
        Ok(true)
    }

    /// Render `snapshot` as a pretty-printed JSON document named after it.
    pub fn export_as_file(snapshot: &Snapshot) -> Result<ExportedFile, BackupError> {
        let stem: String = snapshot
            .name
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();
        Ok(ExportedFile {
            file_name: format!("{stem}_{}.json", snapshot.timestamp.strftime("%Y-%m-%d")),
            contents: serde_json::to_string_pretty(snapshot)?,
        })
    }

    /// Accept an exported backup document. The document is checked for the
    /// required fields before anything is written; it then joins the list
    /// under the same retention rule as [`SnapshotStore::create`].
    pub fn import_from_file(&self, contents: &[u8]) -> Result<Snapshot, BackupError> {
        let value: Value = serde_json::from_slice(contents)
            .map_err(|e| BackupError::InvalidSnapshot(format!("not valid JSON: {e}")))?;
        let Some(object) = value.as_object() else {
            return Err(BackupError::InvalidSnapshot(
                "expected a JSON object".to_string(),
            ));
        };

        let missing: Vec<&str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|field| object.get(*field).is_none_or(Value::is_null))
            .collect();
        if !missing.is_empty() {
            return Err(BackupError::InvalidSnapshot(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }

        let snapshot: Snapshot = serde_json::from_value(value)
            .map_err(|e| BackupError::InvalidSnapshot(e.to_string()))?;
        self.insert(&snapshot)?;
        tracing::info!(id = %snapshot.id, name = %snapshot.name, "backup imported");
        Ok(snapshot)
    }

    /// Prepend, replacing any entry with the same id, then evict past capacity.
    fn insert(&self, snapshot: &Snapshot) -> Result<(), BackupError> {
        let mut raw = self.load_raw();
        raw.retain(|value| value.get("id").and_then(Value::as_str) != Some(snapshot.id.as_str()));
        raw.insert(0, serde_json::to_value(snapshot)?);
        if raw.len() > self.capacity {
            tracing::debug!(evicted = raw.len() - self.capacity, "evicting oldest backups");
            raw.truncate(self.capacity);
        }
        self.persist(&raw)
    }

    fn load_raw(&self) -> Vec<Value> {
        load_or_default(self.store.as_ref(), storage_keys::BACKUPS)
    }

    fn persist(&self, raw: &[Value]) -> Result<(), BackupError> {
        save_state(self.store.as_ref(), storage_keys::BACKUPS, raw)?;
        self.bus.notify(ChangeDomain::Backups);
        Ok(())
    }
}

/// The publish-state map is an object; anything else reads as empty.
fn load_object(store: &dyn KeyValueStore, key: &str) -> Value {
    match load_or_default::<Value>(store, key) {
        Value::Object(map) => Value::Object(map),
        Value::Null => Value::Object(Default::default()),
        _ => {
            tracing::warn!(key, "expected a JSON object, using empty default");
            Value::Object(Default::default())
        }
    }
}
