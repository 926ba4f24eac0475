use psylink_core::models::recovery::{
    DataReport, KeyReport, STATE_DOCUMENT_VERSION, StateDocument,
};
use psylink_core::storage_keys;
use psylink_storage::{ChangeBus, ChangeDomain, KeyValueStore, SharedStore};
use serde::Serialize;
use serde_json::Value;

use crate::error::BackupError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyFailure {
    pub key: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryOutcome {
    /// The document was accepted and its keys were attempted. Per-key
    /// failures do not clear this; they are listed in `failures`.
    pub success: bool,
    pub message: String,
    /// Keys written.
    pub imported: Vec<String>,
    pub failures: Vec<KeyFailure>,
}

/// Whole-state inspection, export and import over every tracked key,
/// including the per-account counters snapshots do not cover.
#[derive(Clone)]
pub struct Recovery {
    store: SharedStore,
    bus: ChangeBus,
}

impl Recovery {
    pub fn new(store: SharedStore, bus: ChangeBus) -> Self {
        Self { store, bus }
    }

    /// Report on every tracked key without changing anything. A key whose
    /// text does not parse is reported as not existing, with the parse error.
    pub fn check_all_data(&self) -> Vec<KeyReport> {
        storage_keys::RECOVERY_KEYS
            .iter()
            .map(|&key| self.check_key(key))
            .collect()
    }

    fn check_key(&self, key: &str) -> KeyReport {
        let mut report = KeyReport {
            key: key.to_string(),
            exists: false,
            size: 0,
            item_count: None,
            error: None,
        };
        match self.store.get(key) {
            Ok(None) => {}
            Ok(Some(text)) => {
                report.size = text.len();
                match serde_json::from_str::<Value>(&text) {
                    Ok(value) => {
                        report.exists = true;
                        report.item_count = match &value {
                            Value::Array(items) => Some(items.len()),
                            Value::Object(map) => Some(map.len()),
                            _ => None,
                        };
                    }
                    Err(e) => {
                        tracing::warn!(key, error = %e, "stored value is not valid JSON");
                        report.error = Some(format!("invalid JSON: {e}"));
                    }
                }
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value unreadable");
                report.error = Some(e.to_string());
            }
        }
        report
    }

    pub fn data_report(&self) -> DataReport {
        DataReport::new(self.check_all_data())
    }

    /// Every readable tracked key with its parsed value. Unreadable keys are
    /// left out.
    pub fn export_document(&self) -> StateDocument {
        let mut data = serde_json::Map::new();
        for &key in storage_keys::RECOVERY_KEYS {
            match self.store.get(key) {
                Ok(Some(text)) => match serde_json::from_str::<Value>(&text) {
                    Ok(value) => {
                        data.insert(key.to_string(), value);
                    }
                    Err(e) => tracing::warn!(key, error = %e, "skipping unparsable key in export"),
                },
                Ok(None) => {}
                Err(e) => tracing::warn!(key, error = %e, "skipping unreadable key in export"),
            }
        }
        StateDocument {
            timestamp: jiff::Timestamp::now(),
            version: STATE_DOCUMENT_VERSION.to_string(),
            data,
        }
    }

    /// [`Recovery::export_document`] as pretty-printed JSON.
    pub fn export_all_data(&self) -> Result<String, BackupError> {
        let document = self.export_document();
        tracing::info!(keys = document.data.len(), "state exported");
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Write back an exported document. The document's shape is checked
    /// first; a bad shape writes nothing. Each key is then written on its
    /// own and failures are collected rather than stopping the import.
    ///
    /// Once the shape is accepted the outcome is a success and the links,
    /// questionnaire type and audit signals always fire, even if every key
    /// failed. Callers check `failures` for partial results.
    pub fn import_all_data(&self, contents: &[u8]) -> RecoveryOutcome {
        let data = match parse_document(contents) {
            Ok(data) => data,
            Err(e) => {
                return RecoveryOutcome {
                    success: false,
                    message: e.to_string(),
                    imported: Vec::new(),
                    failures: Vec::new(),
                };
            }
        };

        let mut imported = Vec::new();
        let mut failures = Vec::new();
        for (key, value) in &data {
            if !storage_keys::RECOVERY_KEYS.contains(&key.as_str()) {
                failures.push(KeyFailure {
                    key: key.clone(),
                    error: "not a recoverable key".to_string(),
                });
                continue;
            }
            let written = serde_json::to_string(value)
                .map_err(BackupError::from)
                .and_then(|text| self.store.set(key, &text).map_err(BackupError::from));
            match written {
                Ok(()) => imported.push(key.clone()),
                Err(e) => {
                    tracing::error!(key, error = %e, "state import failed for key");
                    failures.push(KeyFailure {
                        key: key.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let mut domains = vec![
            ChangeDomain::Links,
            ChangeDomain::QuestionTypes,
            ChangeDomain::AuditLogs,
        ];
        if imported.iter().any(|k| k == storage_keys::BACKUPS) {
            domains.push(ChangeDomain::Backups);
        }
        self.bus.notify_all(&domains);

        tracing::info!(imported = imported.len(), failed = failures.len(), "state imported");
        let message = if failures.is_empty() {
            format!("imported {} key(s)", imported.len())
        } else {
            format!(
                "imported {} key(s), {} failed: {}",
                imported.len(),
                failures.len(),
                failures
                    .iter()
                    .map(|f| format!("{}: {}", f.key, f.error))
                    .collect::<Vec<_>>()
                    .join("; ")
            )
        };
        RecoveryOutcome {
            success: true,
            message,
            imported,
            failures,
        }
    }
}

fn parse_document(contents: &[u8]) -> Result<serde_json::Map<String, Value>, BackupError> {
    let value: Value = serde_json::from_slice(contents)
        .map_err(|e| BackupError::InvalidDocument(format!("not valid JSON: {e}")))?;
    let Value::Object(mut document) = value else {
        return Err(BackupError::InvalidDocument(
            "expected a JSON object".to_string(),
        ));
    };
    match document.remove("data") {
        Some(Value::Object(data)) => Ok(data),
        Some(_) => Err(BackupError::InvalidDocument(
            "\"data\" must be an object of storage keys".to_string(),
        )),
        None => Err(BackupError::InvalidDocument(
            "missing \"data\" field".to_string(),
        )),
    }
}
