// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State shared by every entity kind.

use std::sync::Arc;

use parking_lot::Mutex;

use super::DeviceInfo;
use crate::coordinator::UpdateCoordinator;
use crate::device::{Device, DeviceSet};
use crate::event::{EntityEvent, EventBus};
use crate::subscription::Subscription;
use crate::transport::Transport;

pub(crate) struct EntityBase<T: Transport> {
    device: Arc<Device<T>>,
    coordinator: UpdateCoordinator<T>,
    events: EventBus,
    unique_id: String,
    name: String,
    info: DeviceInfo,
    subscription: Mutex<Option<Subscription<DeviceSet<T>>>>,
}

impl<T: Transport> EntityBase<T> {
    pub(crate) fn new(
        device: &Arc<Device<T>>,
        coordinator: &UpdateCoordinator<T>,
        events: &EventBus,
        unique_id: String,
        name: String,
    ) -> Self {
        Self {
            info: DeviceInfo::for_device(device),
            device: Arc::clone(device),
            coordinator: coordinator.clone(),
            events: events.clone(),
            unique_id,
            name,
            subscription: Mutex::new(None),
        }
    }

    pub(crate) fn device(&self) -> &Device<T> {
        &self.device
    }

    pub(crate) fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn info(&self) -> &DeviceInfo {
        &self.info
    }

    pub(crate) fn available(&self) -> bool {
        self.coordinator.last_update_success()
    }

    /// Subscribes to coordinator passes. Attaching twice is a no-op.
    pub(crate) fn attach(&self) {
        let mut slot = self.subscription.lock();
        if slot.is_some() {
            return;
        }

        let events = self.events.clone();
        let unique_id = self.unique_id.clone();
        *slot = Some(self.coordinator.subscribe(move |_| {
            events.publish(EntityEvent::coordinator_update(unique_id.as_str()));
        }));
    }

    pub(crate) fn detach(&self) -> bool {
        self.subscription.lock().take().is_some()
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Requests a re-render after a successful write.
    pub(crate) fn written(&self) {
        self.events
            .publish(EntityEvent::state_written(self.unique_id.as_str()));
    }
}

impl<T: Transport> std::fmt::Debug for EntityBase<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityBase")
            .field("unique_id", &self.unique_id)
            .field("name", &self.name)
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}
