//! psylink-storage
//!
//! The key-value port every other crate persists through, its in-memory and
//! directory-backed implementations, JSON state helpers and the change bus.

pub mod error;
pub mod file;
pub mod memory;
pub mod notify;
pub mod state;

use std::sync::Arc;

use crate::error::StorageError;

/// A per-key string store. Each key holds one JSON document.
///
/// Implementations use interior mutability; callers share them behind
/// [`SharedStore`].
pub trait KeyValueStore: Send + Sync {
    /// Read the raw text stored under `key`, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the text stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// All keys currently present, sorted.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use notify::{ChangeBus, ChangeDomain};
