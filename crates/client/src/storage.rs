//! Durable client-local key-value storage.
//!
//! The browser original kept its session state in `localStorage`; here the
//! same contract is provided by a single JSON file. Every mutation rewrites
//! the file through a temp-file-and-rename so the on-disk state always
//! matches what the last returned mutation left in memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

/// Storage keys, kept byte-identical to the original web client so the two
/// stores describe the same state.
pub mod keys {
    /// Key for the short-lived access token.
    pub const ACCESS_TOKEN: &str = "token";

    /// Key for the long-lived refresh token.
    pub const REFRESH_TOKEN: &str = "refreshToken";

    /// Key for the serialized cart line list.
    pub const CART: &str = "cart";

    /// Key for the bound table's ID.
    pub const TABLE_ID: &str = "tableId";

    /// Key for the bound table's display number.
    pub const TABLE_NUMBER: &str = "tableNumber";
}

/// Errors that can occur while persisting storage state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing the storage file failed.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded as JSON.
    #[error("storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// File-backed key-value store shared by the session and cart services.
///
/// Cheap to clone; clones share the same in-memory map and backing file.
#[derive(Debug, Clone)]
pub struct Storage {
    inner: Arc<Mutex<StorageInner>>,
}

#[derive(Debug)]
struct StorageInner {
    path: PathBuf,
    entries: BTreeMap<String, serde_json::Value>,
}

impl Storage {
    /// Open the store at `path`, loading any previously persisted state.
    ///
    /// A missing or malformed file yields an empty store rather than an
    /// error - a reload must never fail because of stale local state.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "discarding malformed storage file");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "storage file unreadable, starting empty");
                BTreeMap::new()
            }
        };

        Self {
            inner: Arc::new(Mutex::new(StorageInner { path, entries })),
        }
    }

    /// Read and decode the value stored under `key`.
    ///
    /// Returns `None` for absent keys and for values that no longer decode
    /// as `T` (logged, then treated as absent).
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.lock().entries.get(key)?.clone();
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!(key, error = %err, "stored value no longer decodes, ignoring");
                None
            }
        }
    }

    /// Store `value` under `key` and flush to disk.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or writing fails; the in-memory
    /// map is left unchanged in that case.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let value = serde_json::to_value(value)?;
        self.set_many(vec![(key.to_owned(), value)])
    }

    /// Store several entries in one flush.
    ///
    /// Used where a logical mutation spans keys (token pair, table binding)
    /// so the file never holds half of it.
    pub fn set_many(
        &self,
        entries: Vec<(String, serde_json::Value)>,
    ) -> Result<(), StorageError> {
        let mut inner = self.lock();
        let mut next = inner.entries.clone();
        for (key, value) in entries {
            next.insert(key, value);
        }
        Self::flush(&inner.path, &next)?;
        inner.entries = next;
        Ok(())
    }

    /// Remove `key` and flush. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove_many(&[key])
    }

    /// Remove several keys in one flush.
    pub fn remove_many(&self, remove: &[&str]) -> Result<(), StorageError> {
        let mut inner = self.lock();
        let mut next = inner.entries.clone();
        let mut changed = false;
        for key in remove {
            changed |= next.remove(*key).is_some();
        }
        if !changed {
            return Ok(());
        }
        Self::flush(&inner.path, &next)?;
        inner.entries = next;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, StorageInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(
        path: &PathBuf,
        entries: &BTreeMap<String, serde_json::Value>,
    ) -> Result<(), StorageError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
