use std::sync::Arc;

use psylink_audit::events::AuditEvent;
use psylink_audit::log::AuditLog;
use psylink_backup::{Recovery, SnapshotStore};
use psylink_core::models::audit::TargetType;
use psylink_import::{ImportPipeline, TaskQueue};
use psylink_links::LinkStore;
use psylink_storage::{ChangeBus, FileStore, SharedStore};

use crate::config::PsylinkConfig;

/// Every service a command may need, built once over the data directory.
pub struct AppContext {
    pub config: PsylinkConfig,
    pub actor: String,
    pub json: bool,
    pub links: LinkStore,
    pub pipeline: ImportPipeline,
    pub tasks: TaskQueue,
    pub backups: SnapshotStore,
    pub recovery: Recovery,
    pub audit: AuditLog,
}

impl AppContext {
    pub fn open(config: PsylinkConfig, actor: String, json: bool) -> eyre::Result<Self> {
        let store: SharedStore = Arc::new(FileStore::open(&config.data_dir)?);
        let bus = ChangeBus::new();

        let links = LinkStore::new(store.clone(), bus.clone(), config.base_url.clone());
        Ok(Self {
            pipeline: ImportPipeline::new(links.clone()),
            tasks: TaskQueue::with_capacity(store.clone(), bus.clone(), config.task_capacity),
            backups: SnapshotStore::with_capacity(store.clone(), bus.clone(), config.backup_capacity),
            recovery: Recovery::new(store.clone(), bus.clone()),
            audit: AuditLog::new(store, bus),
            links,
            config,
            actor,
            json,
        })
    }

    /// Record an operation in the audit log. A failed audit write is logged,
    /// not returned: the operation itself already happened.
    pub fn audit(
        &self,
        action: &str,
        target: &str,
        target_type: TargetType,
        details: serde_json::Value,
    ) {
        let event = AuditEvent::new(action, target, target_type, self.actor.as_str())
            .with_details(details);
        if let Err(e) = self.audit.record(event) {
            tracing::warn!(action, error = %e, "failed to record audit entry");
        }
    }
}
