//! Synchronous publish/subscribe with last-value-on-subscribe delivery.
//!
//! # Responsibility
//! - Push every published value to all current subscribers, in order.
//! - Hand the latest value to a subscriber at attach time.
//!
//! # Invariants
//! - Each publish reaches each subscriber exactly once.
//! - Handlers run outside internal locks and may call back into the owner.
//! - Only the latest value is retained; there is no replay buffer.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Token returned by [`Publisher::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct PublisherState<T> {
    latest: Option<T>,
    next_id: u64,
    handlers: BTreeMap<SubscriptionId, Handler<T>>,
}

/// Value stream with a retained latest value.
pub struct Publisher<T> {
    state: Mutex<PublisherState<T>>,
}

impl<T: Clone> Publisher<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PublisherState {
                latest: None,
                next_id: 0,
                handlers: BTreeMap::new(),
            }),
        }
    }

    /// Registers `handler`; it immediately receives the latest value, if any.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let handler: Handler<T> = Arc::new(handler);
        let (id, latest) = {
            let mut state = self.lock();
            let id = SubscriptionId(state.next_id);
            state.next_id += 1;
            state.handlers.insert(id, Arc::clone(&handler));
            (id, state.latest.clone())
        };

        if let Some(value) = latest {
            handler(&value);
        }
        id
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().handlers.remove(&id).is_some()
    }

    /// Stores `value` as latest and delivers it to every current subscriber.
    pub fn publish(&self, value: T) {
        let handlers: Vec<Handler<T>> = {
            let mut state = self.lock();
            state.latest = Some(value.clone());
            state.handlers.values().cloned().collect()
        };

        for handler in handlers {
            handler(&value);
        }
    }

    pub fn latest(&self) -> Option<T> {
        self.lock().latest.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().handlers.len()
    }

    fn lock(&self) -> MutexGuard<'_, PublisherState<T>> {
        // Handlers never run under this lock; state stays consistent on poison.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}
