// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On/off light entity for the thermostat's light relay.

use std::sync::Arc;

use super::DeviceInfo;
use super::base::EntityBase;
use crate::coordinator::UpdateCoordinator;
use crate::device::Device;
use crate::error::Error;
use crate::event::EventBus;
use crate::transport::Transport;

/// Light entity of a thermostat (`{id}_light`).
pub struct LightEntity<T: Transport> {
    base: EntityBase<T>,
}

impl<T: Transport> LightEntity<T> {
    /// Creates the light entity of `device`.
    #[must_use]
    pub fn new(
        device: &Arc<Device<T>>,
        coordinator: &UpdateCoordinator<T>,
        events: &EventBus,
    ) -> Self {
        Self {
            base: EntityBase::new(
                device,
                coordinator,
                events,
                format!("{}_light", device.id()),
                device.name(),
            ),
        }
    }

    /// Unique ID.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        self.base.unique_id()
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Device registry information.
    #[must_use]
    pub fn device_info(&self) -> &DeviceInfo {
        self.base.info()
    }

    /// Returns `false` while the last coordinator pass failed.
    #[must_use]
    pub fn available(&self) -> bool {
        self.base.available()
    }

    /// Light relay state.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.base.device().lights()
    }

    /// Turns the light on.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    pub async fn turn_on(&self) -> Result<(), Error> {
        tracing::info!(device = %self.base.device().name(), "Turning light on");
        self.base.device().set_lights(true).await?;
        self.base.written();
        Ok(())
    }

    /// Turns the light off.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    pub async fn turn_off(&self) -> Result<(), Error> {
        tracing::info!(device = %self.base.device().name(), "Turning light off");
        self.base.device().set_lights(false).await?;
        self.base.written();
        Ok(())
    }

    pub(crate) fn base(&self) -> &EntityBase<T> {
        &self.base
    }
}

impl<T: Transport> std::fmt::Debug for LightEntity<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LightEntity").field(&self.base).finish()
    }
}
