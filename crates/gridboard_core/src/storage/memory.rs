//! In-memory key-value backend.
//!
//! Mirrors local storage semantics closely enough for tests: a byte quota
//! counted over keys and values, a disabled switch, and per-key write counters.

use super::{KeyValueStore, StorageError, StorageResult};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

/// Single-threaded in-memory store.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<String, String>>,
    write_counts: RefCell<HashMap<String, usize>>,
    disabled: Cell<bool>,
    quota_bytes: Option<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes growing it past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Simulates the host disabling (or re-enabling) storage.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// Number of successful `set` calls for `key`.
    pub fn writes_to(&self, key: &str) -> usize {
        self.write_counts.borrow().get(key).copied().unwrap_or(0)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn ensure_enabled(&self) -> StorageResult<()> {
        if self.disabled.get() {
            return Err(StorageError::Disabled);
        }
        Ok(())
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.ensure_enabled()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_enabled()?;
        if let Some(quota_bytes) = self.quota_bytes {
            let requested_bytes = self.used_bytes_without(key) + key.len() + value.len();
            if requested_bytes > quota_bytes {
                return Err(StorageError::QuotaExceeded {
                    requested_bytes,
                    quota_bytes,
                });
            }
        }

        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        *self
            .write_counts
            .borrow_mut()
            .entry(key.to_string())
            .or_insert(0) += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.ensure_enabled()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
