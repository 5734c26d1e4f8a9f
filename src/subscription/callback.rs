// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observer registry and subscription handles.
//!
//! - [`SubscriptionId`] - Unique identifier of one registered observer
//! - [`ObserverRegistry`] - Stores observers and dispatches payloads to them
//! - [`Subscription`] - Handle that removes its observer when dropped

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

/// Unique identifier for a subscription.
///
/// IDs are unique within the lifetime of the registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for observer callbacks.
type Observer<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Registry of observers interested in payloads of type `E`.
///
/// Observers are called synchronously, in no particular order. The set of
/// observers is snapshotted before dispatch, so an observer may subscribe or
/// unsubscribe from inside its own callback without deadlocking.
pub struct ObserverRegistry<E: ?Sized> {
    next_id: AtomicU64,
    observers: RwLock<HashMap<SubscriptionId, Observer<E>>>,
}

impl<E: ?Sized> ObserverRegistry<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            observers: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers an observer and returns its ID.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.observers.write().insert(id, Arc::new(callback));
        id
    }

    /// Removes an observer.
    ///
    /// Returns `true` if the observer was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.write().remove(&id).is_some()
    }

    /// Removes every observer.
    pub fn clear(&self) {
        self.observers.write().clear();
    }

    /// Calls every registered observer with `payload`.
    pub fn dispatch(&self, payload: &E) {
        let observers: Vec<Observer<E>> = self.observers.read().values().cloned().collect();
        for observer in observers {
            observer(payload);
        }
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Returns `true` if no observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }
}

impl<E: ?Sized + 'static> ObserverRegistry<E> {
    /// Registers an observer and returns a handle that unsubscribes it when
    /// dropped.
    pub fn subscribe_scoped<F>(self: &Arc<Self>, callback: F) -> Subscription<E>
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        Subscription {
            id: self.subscribe(callback),
            registry: Arc::downgrade(self),
        }
    }
}

impl<E: ?Sized> Default for ObserverRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> std::fmt::Debug for ObserverRegistry<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.len())
            .finish()
    }
}

/// Handle to a registered observer.
///
/// Dropping the handle removes the observer. If the registry is already gone
/// the drop is a no-op.
#[must_use = "dropping a Subscription unsubscribes the observer"]
pub struct Subscription<E: ?Sized + 'static> {
    id: SubscriptionId,
    registry: Weak<ObserverRegistry<E>>,
}

impl<E: ?Sized + 'static> Subscription<E> {
    /// Returns the ID of the observer this handle controls.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Removes the observer now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<E: ?Sized + 'static> Drop for Subscription<E> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(self.id);
        }
    }
}

impl<E: ?Sized + 'static> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Subscription").field(&self.id).finish()
    }
}
