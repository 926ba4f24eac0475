use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Format tag of a whole-state export document.
pub const STATE_DOCUMENT_VERSION: &str = "1.0";

/// Health of one storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct KeyReport {
    pub key: String,
    pub exists: bool,
    /// Byte length of the stored text.
    pub size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DataReport {
    pub timestamp: jiff::Timestamp,
    pub results: Vec<KeyReport>,
    pub summary: DataReportSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DataReportSummary {
    pub total: usize,
    pub exists: usize,
    pub missing: usize,
    pub total_size: usize,
}

impl DataReport {
    pub fn new(results: Vec<KeyReport>) -> Self {
        let exists = results.iter().filter(|r| r.exists).count();
        let summary = DataReportSummary {
            total: results.len(),
            exists,
            missing: results.len() - exists,
            total_size: results.iter().map(|r| r.size).sum(),
        };
        Self {
            timestamp: jiff::Timestamp::now(),
            results,
            summary,
        }
    }
}

/// The disaster-recovery file: `{timestamp, version, data: {<key>: <value>}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    pub timestamp: jiff::Timestamp,
    pub version: String,
    pub data: serde_json::Map<String, serde_json::Value>,
}
