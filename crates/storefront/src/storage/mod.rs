//! Client-local persistent storage.
//!
//! # Records
//!
//! Each logical record lives under a fixed key as JSON text:
//!
//! - [`keys::CART`] - array of cart line items
//! - [`keys::USER`] - the user profile object
//! - [`keys::SUPPORT_THREADS`] - array of support chat threads
//!
//! # Layers
//!
//! - [`KeyValueStore`] - raw text get/set, implemented by [`MemoryStore`] and [`FileStore`]
//! - [`RecordStore`] - typed JSON read/write on top of any key-value store
//!
//! Writes overwrite unconditionally. Nothing here coordinates concurrent
//! writers; the last write wins.

mod file;
mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Fixed storage keys, one per record.
pub mod keys {
    /// Key for the cart line items.
    pub const CART: &str = "cloudmart_cart";

    /// Key for the user profile.
    pub const USER: &str = "cloudmart_user";

    /// Key for the support chat threads.
    pub const SUPPORT_THREADS: &str = "supportThreads";
}

/// Errors raised by the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing document as a whole could not be parsed.
    #[error("storage document at {path} is unreadable: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record holds text that does not decode to the expected shape.
    #[error("record {key} is corrupted: {source}")]
    Corrupted {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded as JSON.
    #[error("failed to serialize record {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The store cannot be used (e.g. a poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Raw persistent key-value storage for one client origin.
pub trait KeyValueStore: Send + Sync {
    /// Get the text stored under `key`, or `None` if there is no entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Typed JSON records over a shared [`KeyValueStore`].
///
/// Cheaply cloneable; clones share the same backing store.
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<dyn KeyValueStore>,
}

impl RecordStore {
    /// Wrap a key-value store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner: store }
    }

    /// A record store over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Access the raw key-value store.
    #[must_use]
    pub fn raw(&self) -> &dyn KeyValueStore {
        self.inner.as_ref()
    }

    /// Read and decode the record under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupted`] if the stored text does not decode
    /// to `T`, or any error from the underlying store.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.inner.get(key)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupted {
                key: key.to_string(),
                source,
            })
    }

    /// Like [`read`](Self::read), but treats a corrupted record as absent.
    ///
    /// Corruption is logged and otherwise ignored. Errors from the underlying
    /// store still propagate.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying store.
    pub fn read_lenient<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read(key) {
            Err(StorageError::Corrupted { key, source }) => {
                tracing::warn!(%key, error = %source, "Ignoring corrupted record");
                Ok(None)
            }
            other => other,
        }
    }

    /// Encode `value` and store it under `key`, replacing the previous record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialize`] if encoding fails, or any error
    /// from the underlying store.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.inner.set(key, &raw)?;
        tracing::debug!(key, bytes = raw.len(), "Record written");
        Ok(())
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}
