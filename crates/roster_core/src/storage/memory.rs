//! In-process key-value store with an optional byte quota.

use super::{KeyValueStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// Map-backed store; the quota counts key and value bytes across all entries.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Mutex<Option<usize>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes growing it past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota_bytes: Mutex::new(Some(quota_bytes)),
        }
    }

    /// Replaces the quota; `None` removes the limit.
    pub fn set_quota(&self, quota_bytes: Option<usize>) -> StorageResult<()> {
        let mut quota = self
            .quota_bytes
            .lock()
            .map_err(|_| StorageError::LockPoisoned)?;
        *quota = quota_bytes;
        Ok(())
    }

    /// Returns the total stored bytes.
    pub fn used_bytes(&self) -> StorageResult<usize> {
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.iter().map(|(k, v)| k.len() + v.len()).sum())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let quota = *self
            .quota_bytes
            .lock()
            .map_err(|_| StorageError::LockPoisoned)?;
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;

        if let Some(quota_bytes) = quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let requested_bytes = others + key.len() + value.len();
            if requested_bytes > quota_bytes {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    requested_bytes,
                    quota_bytes,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
