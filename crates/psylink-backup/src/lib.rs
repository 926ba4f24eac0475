//! psylink-backup
//!
//! Named snapshots of the dashboard's persisted collections, and the flat
//! whole-state export/import used for disaster recovery.

pub mod error;
pub mod recovery;
pub mod snapshot;

pub use recovery::{KeyFailure, Recovery, RecoveryOutcome};
pub use snapshot::{DEFAULT_CAPACITY, ExportedFile, RestoreOutcome, SnapshotStore};
