use serde::{Serialize, de::DeserializeOwned};

use crate::KeyValueStore;
use crate::error::StorageError;

/// Load and deserialize the JSON value under `key`. `Ok(None)` if absent.
pub fn load_state<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Load the value under `key`, falling back to `T::default()` when the key is
/// missing, unreadable or malformed. Corruption is logged, never returned.
pub fn load_or_default<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    match load_state(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "stored value unreadable, using empty default");
            T::default()
        }
    }
}

/// Serialize `value` as compact JSON and store it under `key` in one write.
pub fn save_state<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_string(value)?;
    store.set(key, &body)
}
