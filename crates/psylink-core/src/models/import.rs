use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Outcome of one batch link import.
///
/// `success + failed` always equals the number of data rows examined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportResult {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<RowError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RowError {
    /// 1-based data row; the header is row 0.
    pub row: usize,
    pub message: String,
}

impl ImportResult {
    pub fn total(&self) -> usize {
        self.success + self.failed
    }
}

/// Progress bookkeeping for one import job. Display only, never a scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImportTask {
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub file_size: u64,
    pub question_count: usize,
    #[serde(default)]
    pub added: usize,
    #[serde(default)]
    pub updated: usize,
    /// 0–100.
    #[serde(default)]
    pub progress: u8,
    pub status: ImportTaskStatus,
    pub created_at: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<jiff::Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ImportTaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl ImportTaskStatus {
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            ImportTaskStatus::Completed | ImportTaskStatus::Failed | ImportTaskStatus::Cancelled
        )
    }
}
