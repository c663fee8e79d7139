//! Durable key-value storage abstraction.
//!
//! # Responsibility
//! - Model the single-key durable store the roster collection lives in.
//! - Keep backend details (SQLite, in-process map) behind one trait.
//!
//! # Invariants
//! - `set` replaces the whole value for a key in one write.
//! - A failed `set` leaves the previous value readable.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Backend failure for key-value reads and writes.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Write rejected because the store would exceed its byte quota.
    QuotaExceeded {
        key: String,
        requested_bytes: usize,
        quota_bytes: usize,
    },
    /// Another thread panicked while holding the backend lock.
    LockPoisoned,
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded {
                key,
                requested_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {requested_bytes} bytes requested, quota is {quota_bytes}"
            ),
            Self::LockPoisoned => write!(f, "storage lock poisoned"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::LockPoisoned => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String-keyed durable store with whole-value replacement.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}
