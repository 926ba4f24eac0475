//! psylink-core
//!
//! Pure domain types and storage key conventions.
//! No storage dependency; this is the shared vocabulary of the psylink system.

pub mod error;
pub mod models;
pub mod storage_keys;
pub mod time;
