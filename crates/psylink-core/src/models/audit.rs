use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One entry of the persisted operation log shown on the audit page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OperationLog {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub action: String,
    pub target: String,
    pub target_type: TargetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub timestamp: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TargetType {
    Link,
    Questionnaire,
    User,
    System,
    Other,
}
