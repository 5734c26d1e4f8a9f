// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting entity events.

use tokio::sync::broadcast;

use super::EntityEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcasts [`EntityEvent`]s to the host.
///
/// Every receiver gets its own copy of each event. A receiver that falls
/// more than the channel capacity behind loses the oldest events and sees
/// `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use themo_lib::event::{EntityEvent, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(EntityEvent::state_written("1234_light"));
/// assert_eq!(rx.try_recv().unwrap().unique_id(), "1234_light");
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EntityEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus buffering up to `capacity` events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns a receiver for every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EntityEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event. Without receivers the event is discarded.
    pub fn publish(&self, event: EntityEvent) {
        // Ignore errors (no subscribers)
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    #[test]
    fn events_reach_every_receiver() {
        let bus = EventBus::new();
        let mut climate = bus.subscribe();
        let mut host = bus.subscribe();

        bus.publish(EntityEvent::coordinator_update("7_power"));

        assert_eq!(climate.try_recv().unwrap().unique_id(), "7_power");
        assert_eq!(host.try_recv().unwrap().unique_id(), "7_power");
        assert_eq!(host.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn receivers_only_see_later_events() {
        let bus = EventBus::new();
        bus.publish(EntityEvent::state_written("7_light"));

        let mut rx = bus.subscribe();
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn clones_share_one_channel() {
        let bus = EventBus::new();
        let entity_side = bus.clone();
        let mut rx = bus.subscribe();
        assert_eq!(entity_side.subscriber_count(), 1);

        entity_side.publish(EntityEvent::state_written("7_light"));
        assert_eq!(rx.try_recv().unwrap().unique_id(), "7_light");
    }

    #[tokio::test]
    async fn slow_receiver_lags() {
        let bus = EventBus::with_capacity(2);
        let mut rx = bus.subscribe();

        for id in ["1_climate", "1_light", "1_power"] {
            bus.publish(EntityEvent::coordinator_update(id));
        }

        assert_eq!(rx.recv().await, Err(RecvError::Lagged(1)));
        assert_eq!(rx.recv().await.unwrap().unique_id(), "1_light");
    }
}
