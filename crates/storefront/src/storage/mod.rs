//! Key-value persistence.
//!
//! Every piece of client state that survives a restart (tokens, the cached
//! user, cart and bag contents, chat transcripts) goes through
//! [`KeyValueStore`]. Values are strings; [`StorageExt`] layers typed JSON on
//! top. Reads and writes are synchronous and last-write-wins.
//!
//! # Stores
//!
//! - [`MemoryStore`] - process-local map, used by tests and ephemeral runs
//! - [`FileStore`] - JSON file on disk, used by the CLI

mod file;
pub mod keys;
mod memory;
pub mod tokens;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use tokens::TokenStore;

/// Errors raised by a store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded.
    #[error("serialization error for key {key}: {source}")]
    Serde {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}

/// A string key-value store.
///
/// Implementations must be safe to share between tasks; the state containers
/// hold them behind `Arc<dyn KeyValueStore>`.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared handle to a store.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Typed JSON access on top of any [`KeyValueStore`].
pub trait StorageExt: KeyValueStore {
    /// Read and decode a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serde` if the stored value is not valid JSON for `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.get(key)?
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|source| StorageError::Serde {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Encode and write a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serde {
            key: key.to_string(),
            source,
        })?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> StorageExt for S {}

/// Decode a persisted list, treating unreadable data as empty.
///
/// State containers rehydrate with this: a corrupt entry is logged and
/// replaced on the next write rather than blocking startup.
pub(crate) fn load_list<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    match store.get_json::<Vec<T>>(key) {
        Ok(items) => items.unwrap_or_default(),
        Err(error) => {
            tracing::warn!(%key, %error, "Failed to parse persisted list, starting empty");
            Vec::new()
        }
    }
}

/// Write a value, logging instead of failing.
pub(crate) fn persist<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    if let Err(error) = store.set_json(key, value) {
        tracing::warn!(%key, %error, "Failed to persist state");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_helpers_roundtrip_through_dyn_store() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store.set_json("numbers", &[1, 2, 3]).unwrap();
        let numbers: Option<Vec<i32>> = store.get_json("numbers").unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));
        assert_eq!(store.get_json::<Vec<i32>>("missing").unwrap(), None);
    }

    #[test]
    fn test_get_json_reports_the_bad_key() {
        let store = MemoryStore::new();
        store.set("cart", "{not json").unwrap();
        let err = store.get_json::<Vec<i32>>("cart").unwrap_err();
        assert!(err.to_string().contains("cart"));
    }

    #[test]
    fn test_load_list_tolerates_corruption() {
        let store = MemoryStore::new();
        store.set("bag", "[[[").unwrap();
        assert!(load_list::<i32>(&store, "bag").is_empty());
    }
}
