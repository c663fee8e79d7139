//! Whole-collection persistence for participants.
//!
//! # Responsibility
//! - Read the collection from one key, treating absence and corruption as empty.
//! - Skip individual records that do not match the participant schema.
//! - Write the collection back as a single atomic replace.
//!
//! # Invariants
//! - `load` never returns an error; unreadable state is logged and skipped.
//! - `replace` serializes before touching storage, so a serialization
//!   failure cannot clobber the persisted value.

use crate::model::participant::Participant;
use crate::storage::{KeyValueStore, StorageError};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "participants";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure to persist the collection.
#[derive(Debug)]
pub enum StoreError {
    Serialize(serde_json::Error),
    Write(StorageError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to serialize participants: {err}"),
            Self::Write(err) => write!(f, "failed to write participants: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Write(err) => Some(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Write(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Adapter between the participant collection and a key-value backend.
pub struct ParticipantStore<S: KeyValueStore> {
    kv: S,
    key: String,
}

impl<S: KeyValueStore> ParticipantStore<S> {
    /// Binds the adapter to [`DEFAULT_STORAGE_KEY`].
    pub fn new(kv: S) -> Self {
        Self::with_key(kv, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.kv
    }

    /// Reads the full collection.
    ///
    /// Returns an empty collection when the key is absent, the backend read
    /// fails, or the stored value is not a JSON array. Array entries that do
    /// not decode as participants are logged and dropped; the rest load.
    pub fn load(&self) -> Vec<Participant> {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                error!(
                    "event=store_load module=store status=error error_code=read_failed key={} error={}",
                    self.key, err
                );
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(records) => records,
            Err(err) => {
                error!(
                    "event=store_load module=store status=error error_code=parse_failed key={} error={}",
                    self.key, err
                );
                return Vec::new();
            }
        };

        let total = records.len();
        let participants = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| {
                serde_json::from_value::<Participant>(record)
                    .map_err(|err| {
                        error!(
                            "event=store_load module=store status=error error_code=record_invalid key={} index={} error={}",
                            self.key, index, err
                        );
                    })
                    .ok()
            })
            .collect::<Vec<_>>();

        debug!(
            "event=store_load module=store status=ok key={} count={} skipped={}",
            self.key,
            participants.len(),
            total - participants.len()
        );
        participants
    }

    /// Replaces the persisted collection with `participants`.
    pub fn replace(&self, participants: &[Participant]) -> StoreResult<()> {
        let raw = serde_json::to_string(participants)?;
        if let Err(err) = self.kv.set(&self.key, &raw) {
            error!(
                "event=store_replace module=store status=error error_code=write_failed key={} count={} error={}",
                self.key,
                participants.len(),
                err
            );
            return Err(err.into());
        }

        debug!(
            "event=store_replace module=store status=ok key={} count={}",
            self.key,
            participants.len()
        );
        Ok(())
    }
}
