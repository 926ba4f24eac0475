use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("link not found: {0}")]
    NotFound(String),

    /// `test_links` holds something other than a JSON array. Nothing is
    /// written over it.
    #[error("links collection is unreadable: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Lifecycle(#[from] psylink_core::error::CoreError),

    #[error("link entry could not be encoded or decoded: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] psylink_storage::error::StorageError),
}
