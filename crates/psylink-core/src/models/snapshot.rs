use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Format tag written into every snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// A named, point-in-time capture of the dashboard's persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Snapshot {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub timestamp: jiff::Timestamp,
    pub data: SnapshotBundle,
    /// Approximate serialized size of `data`, for display.
    #[serde(default)]
    pub size: usize,
    #[serde(default = "default_version")]
    pub version: String,
}

/// The captured collections. A `None` section is left alone on restore.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SnapshotBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questionnaires: Option<QuestionnaireBundle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_logs: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuestionnaireBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_types: Option<Vec<serde_json::Value>>,
    /// Question bank id → publish record; always a JSON object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_state: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<serde_json::Value>>,
}

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}
