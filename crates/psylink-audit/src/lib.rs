//! psylink-audit
//!
//! Operation log: structured `tracing` events plus the persisted log the
//! audit page reads.

pub mod error;
pub mod events;
pub mod log;

pub use events::AuditEvent;
pub use log::{AuditLog, AuditQuery};
