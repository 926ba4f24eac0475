use psylink_core::models::audit::{OperationLog, TargetType};
use serde::Serialize;
use tracing::info;

/// A structured audit event for one administrative action.
///
/// Emitted via `tracing` so it reaches whatever subscriber the binary
/// installed, and convertible into the [`OperationLog`] entry the audit page
/// lists.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: String,
    pub target: String,
    pub target_type: TargetType,
    pub user_id: String,
    pub username: String,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        action: impl Into<String>,
        target: impl Into<String>,
        target_type: TargetType,
        user_id: impl Into<String>,
    ) -> Self {
        let user_id = user_id.into();
        Self {
            action: action.into(),
            target: target.into(),
            target_type,
            username: user_id.clone(),
            user_id,
            details: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        info!(
            audit.action = %self.action,
            audit.target = %self.target,
            audit.target_type = ?self.target_type,
            audit.user_id = %self.user_id,
            "audit event"
        );
    }

    pub fn into_log(self) -> OperationLog {
        let timestamp = jiff::Timestamp::now();
        OperationLog {
            id: format!(
                "log_{}_{}",
                timestamp.as_millisecond(),
                &uuid::Uuid::new_v4().simple().to_string()[..9]
            ),
            user_id: self.user_id,
            username: self.username,
            action: self.action,
            target: self.target,
            target_type: self.target_type,
            details: self.details,
            timestamp,
        }
    }
}
