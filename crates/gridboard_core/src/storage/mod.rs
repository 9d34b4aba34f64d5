//! Key-value store seam standing in for browser local storage.
//!
//! # Responsibility
//! - Define the `get/set/remove/probe` contract every backend implements.
//! - Provide an in-memory backend and a SQLite-file backend.
//!
//! # Invariants
//! - Backends never panic; every failure is a `StorageError`.
//! - `probe_available` leaves no probe key behind on success.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use uuid::Uuid;

mod memory;
pub mod schema;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a key-value backend.
#[derive(Debug)]
pub enum StorageError {
    /// Backend refuses all access (e.g. storage disabled by the host).
    Disabled,
    /// Write would exceed the backend's byte quota.
    QuotaExceeded { requested_bytes: usize, quota_bytes: usize },
    /// SQLite backend failure.
    Sqlite(rusqlite::Error),
    /// Store file was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "storage is disabled"),
            Self::QuotaExceeded {
                requested_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded: {requested_bytes} bytes requested, quota is {quota_bytes}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "storage schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// String key-value store with an availability probe.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Writes and deletes a throwaway key; any failure means unavailable.
    fn probe_available(&self) -> bool {
        let probe_key = format!("__gridboard_probe_{}__", Uuid::new_v4().simple());
        self.set(&probe_key, "probe").is_ok() && self.remove(&probe_key).is_ok()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn probe_available(&self) -> bool {
        (**self).probe_available()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn probe_available(&self) -> bool {
        (**self).probe_available()
    }
}
