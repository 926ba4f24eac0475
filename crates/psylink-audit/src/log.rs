use psylink_core::models::audit::{OperationLog, TargetType};
use psylink_core::storage_keys;
use psylink_storage::state::{load_or_default, save_state};
use psylink_storage::{ChangeBus, ChangeDomain, SharedStore};

use crate::error::AuditError;
use crate::events::AuditEvent;

/// Entries kept before the oldest are dropped.
pub const MAX_LOGS: usize = 10_000;

/// Filters for [`AuditLog::query`]. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub user_id: Option<String>,
    /// Substring match on the action name.
    pub action: Option<String>,
    pub target_type: Option<TargetType>,
    pub start: Option<jiff::Timestamp>,
    pub end: Option<jiff::Timestamp>,
    pub limit: Option<usize>,
}

/// The persisted operation log, newest first.
#[derive(Clone)]
pub struct AuditLog {
    store: SharedStore,
    bus: ChangeBus,
}

impl AuditLog {
    pub fn new(store: SharedStore, bus: ChangeBus) -> Self {
        Self { store, bus }
    }

    /// Typed entries. Entries written by other tools that do not match the
    /// current shape are skipped, not dropped from storage.
    pub fn load(&self) -> Vec<OperationLog> {
        self.load_raw()
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable audit entry");
                    None
                }
            })
            .collect()
    }

    fn load_raw(&self) -> Vec<serde_json::Value> {
        load_or_default(self.store.as_ref(), storage_keys::AUDIT_LOGS)
    }

    /// Emit `event` and prepend it to the persisted log.
    pub fn record(&self, event: AuditEvent) -> Result<OperationLog, AuditError> {
        event.emit();
        let entry = event.into_log();

        let mut logs = self.load_raw();
        logs.insert(0, serde_json::to_value(&entry)?);
        logs.truncate(MAX_LOGS);
        save_state(self.store.as_ref(), storage_keys::AUDIT_LOGS, &logs)?;

        self.bus.notify(ChangeDomain::AuditLogs);
        Ok(entry)
    }

    pub fn query(&self, filter: &AuditQuery) -> Vec<OperationLog> {
        let matching = self.load().into_iter().filter(|log| {
            filter.user_id.as_ref().is_none_or(|u| &log.user_id == u)
                && filter.action.as_ref().is_none_or(|a| log.action.contains(a.as_str()))
                && filter.target_type.is_none_or(|t| log.target_type == t)
                && filter.start.is_none_or(|s| log.timestamp >= s)
                && filter.end.is_none_or(|e| log.timestamp <= e)
        });
        match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    pub fn clear(&self) -> Result<(), AuditError> {
        self.store.remove(storage_keys::AUDIT_LOGS)?;
        self.bus.notify(ChangeDomain::AuditLogs);
        Ok(())
    }
}
