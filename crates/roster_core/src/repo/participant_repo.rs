//! Participant repository: cached collection, mutations and change stream.
//!
//! # Responsibility
//! - Own the in-memory collection snapshot and the refresh timestamp.
//! - Provide create/update/delete over whole-collection persistence.
//! - Publish the updated collection to subscribers after every mutation.
//! - Hold the editing claim handed from list views to the form.
//!
//! # Invariants
//! - This repository is the only writer of its storage key.
//! - A failed write leaves the cache untouched and publishes nothing.
//! - Update keeps `id` and `created_at`; `updated_at` strictly increases.
//! - The editing target is stored by id and re-resolved on read.
//! - Read-modify-write is not serialized across calls: last write wins.

use crate::clock::{Clock, SystemClock};
use crate::model::participant::{Participant, ParticipantId};
use crate::publish::{Publisher, SubscriptionId};
use crate::store::participant_store::{ParticipantStore, StoreError};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};

/// Immutable point-in-time copy of the collection.
pub type ParticipantSnapshot = Arc<[Participant]>;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository mutation failure.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Which branch `save` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

impl SaveOutcome {
    fn as_str(self) -> &'static str {
        match self {
            SaveOutcome::Created => "create",
            SaveOutcome::Updated => "update",
        }
    }
}

/// Cached, observable participant collection over a key-value backend.
pub struct ParticipantRepository<S: KeyValueStore, C: Clock = SystemClock> {
    store: ParticipantStore<S>,
    clock: C,
    cache: Mutex<ParticipantSnapshot>,
    editing_target: Mutex<Option<ParticipantId>>,
    participants: Publisher<ParticipantSnapshot>,
    last_refresh: Publisher<DateTime<Utc>>,
}

impl<S: KeyValueStore> ParticipantRepository<S, SystemClock> {
    /// Creates a repository on the default storage key using the system clock.
    pub fn new(kv: S) -> Self {
        Self::from_store(ParticipantStore::new(kv), SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> ParticipantRepository<S, C> {
    /// Creates a repository over a configured store adapter.
    ///
    /// The cache starts empty; nothing is read until `get_all` or `refresh`.
    pub fn from_store(store: ParticipantStore<S>, clock: C) -> Self {
        Self {
            store,
            clock,
            cache: Mutex::new(Arc::from(Vec::new())),
            editing_target: Mutex::new(None),
            participants: Publisher::new(),
            last_refresh: Publisher::new(),
        }
    }

    pub fn store(&self) -> &ParticipantStore<S> {
        &self.store
    }

    /// Reloads from storage, updates the cache and publishes the result.
    pub fn get_all(&self) -> ParticipantSnapshot {
        let snapshot = self.reload();
        self.participants.publish(Arc::clone(&snapshot));
        snapshot
    }

    /// Reloads, publishes the collection, then publishes the refresh time.
    ///
    /// Completes in one step; concurrent refreshes are independent and the
    /// last one to finish owns the cache.
    pub async fn refresh(&self) -> ParticipantSnapshot {
        let snapshot = self.reload();
        let refreshed_at = self.clock.now();
        self.participants.publish(Arc::clone(&snapshot));
        self.last_refresh.publish(refreshed_at);
        info!(
            "event=participants_refresh module=repo status=ok count={}",
            snapshot.len()
        );
        snapshot
    }

    /// Creates or updates one participant by id.
    ///
    /// Update path replaces the entry in place, keeps `created_at`, and sets
    /// `updated_at` to now. Create path appends the participant as given.
    pub fn save(&self, participant: Participant) -> RepoResult<SaveOutcome> {
        let mut participants = self.store.load();
        let outcome = match participants.iter().position(|p| p.id == participant.id) {
            Some(index) => {
                let previous = &participants[index];
                let updated_at = next_updated_at(previous.updated_at, self.clock.now());
                let created_at = previous.created_at;
                participants[index] = Participant {
                    created_at,
                    updated_at,
                    ..participant
                };
                SaveOutcome::Updated
            }
            None => {
                participants.push(participant);
                SaveOutcome::Created
            }
        };

        if let Err(err) = self.store.replace(&participants) {
            error!(
                "event=participant_save module=repo status=error path={} error={}",
                outcome.as_str(),
                err
            );
            return Err(err.into());
        }

        let snapshot = self.commit(participants);
        info!(
            "event=participant_save module=repo status=ok path={} count={}",
            outcome.as_str(),
            snapshot.len()
        );
        Ok(outcome)
    }

    /// Removes the participant with `id`.
    ///
    /// Deleting an absent id still rewrites and publishes the unchanged
    /// collection and reports success.
    pub fn delete(&self, id: &str) -> RepoResult<()> {
        let mut participants = self.store.load();
        let before = participants.len();
        participants.retain(|p| p.id != id);
        let removed = before - participants.len();

        if let Err(err) = self.store.replace(&participants) {
            error!(
                "event=participant_delete module=repo status=error error={}",
                err
            );
            return Err(err.into());
        }

        let snapshot = self.commit(participants);
        info!(
            "event=participant_delete module=repo status=ok removed={} count={}",
            removed,
            snapshot.len()
        );
        Ok(())
    }

    /// Returns the cached collection without touching storage.
    pub fn snapshot(&self) -> ParticipantSnapshot {
        Arc::clone(&self.lock_cache())
    }

    /// Looks up one participant in the cache.
    pub fn find(&self, id: &str) -> Option<Participant> {
        self.lock_cache().iter().find(|p| p.id == id).cloned()
    }

    /// Time of the last completed `refresh`, if any.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh.latest()
    }

    /// Subscribes to collection pushes; the latest collection is delivered at attach.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ParticipantSnapshot) + Send + Sync + 'static,
    {
        self.participants.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.participants.unsubscribe(id)
    }

    /// Subscribes to refresh timestamps.
    pub fn subscribe_last_refresh<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&DateTime<Utc>) + Send + Sync + 'static,
    {
        self.last_refresh.subscribe(handler)
    }

    pub fn unsubscribe_last_refresh(&self, id: SubscriptionId) -> bool {
        self.last_refresh.unsubscribe(id)
    }

    /// Claims `participant` (by id) for editing, or clears the claim.
    pub fn set_editing_target(&self, participant: Option<&Participant>) {
        *self.lock_editing() = participant.map(|p| p.id.clone());
    }

    /// Resolves the editing claim against the current cache.
    ///
    /// Returns `None` when nothing is claimed or the participant is gone.
    pub fn editing_target(&self) -> Option<Participant> {
        let id = self.lock_editing().clone()?;
        let resolved = self.find(&id);
        if resolved.is_none() {
            debug!("event=editing_target_resolve module=repo status=stale");
        }
        resolved
    }

    pub fn editing_target_id(&self) -> Option<ParticipantId> {
        self.lock_editing().clone()
    }

    pub fn clear_editing_target(&self) {
        *self.lock_editing() = None;
    }

    fn reload(&self) -> ParticipantSnapshot {
        let snapshot: ParticipantSnapshot = Arc::from(self.store.load());
        *self.lock_cache() = Arc::clone(&snapshot);
        snapshot
    }

    fn commit(&self, participants: Vec<Participant>) -> ParticipantSnapshot {
        let snapshot: ParticipantSnapshot = Arc::from(participants);
        *self.lock_cache() = Arc::clone(&snapshot);
        self.participants.publish(Arc::clone(&snapshot));
        snapshot
    }

    fn lock_cache(&self) -> MutexGuard<'_, ParticipantSnapshot> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_editing(&self) -> MutexGuard<'_, Option<ParticipantId>> {
        self.editing_target
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Returns `now`, or one millisecond past `previous` when the clock has not moved.
fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}
