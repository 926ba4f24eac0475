use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("storage error: {0}")]
    Storage(#[from] psylink_storage::error::StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid backup file: {0}")]
    InvalidSnapshot(String),

    #[error("invalid recovery document: {0}")]
    InvalidDocument(String),

    #[error("backup not found: {0}")]
    NotFound(String),
}
