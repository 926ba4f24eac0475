use thiserror::Error;

use crate::models::link::LinkStatus;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid status '{0}' (expected one of unused, used, expired, disabled)")]
    InvalidStatus(String),

    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("cannot change link status from {from} to {to}")]
    InvalidTransition { from: LinkStatus, to: LinkStatus },
}
