// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing entities.
//!
//! Every thermostat is exposed as five entities: one [`ClimateEntity`], one
//! [`LightEntity`] and three [`SensorEntity`]s (power, floor temperature,
//! room temperature). Entities are plain accessor records over the device
//! proxy's cached snapshot.
//!
//! Entities notify the host through the integration's
//! [`EventBus`](crate::event::EventBus):
//!
//! - after an action wrote through to the device, with
//!   [`EntityEvent::StateWritten`](crate::event::EntityEvent::StateWritten),
//! - after every successful coordinator pass once attached, with
//!   [`EntityEvent::CoordinatorUpdate`](crate::event::EntityEvent::CoordinatorUpdate).
//!
//! A failed action returns its error and publishes nothing.

mod base;
mod climate;
mod device_info;
mod light;
mod sensor;

pub use climate::{ClimateEntity, ClimateFeatures, TEMPERATURE_UNIT};
pub use device_info::{DOMAIN, DeviceInfo, MANUFACTURER, MODEL};
pub use light::LightEntity;
pub use sensor::{SensorDeviceClass, SensorEntity, SensorKind};

use std::sync::Arc;

use base::EntityBase;

use crate::coordinator::UpdateCoordinator;
use crate::device::Device;
use crate::event::EventBus;
use crate::transport::Transport;

/// Host platform an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Climate control.
    Climate,
    /// Light switch.
    Light,
    /// Measurement sensor.
    Sensor,
}

impl Platform {
    /// Host name of the platform.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Climate => "climate",
            Self::Light => "light",
            Self::Sensor => "sensor",
        }
    }
}

/// Any entity of the integration.
#[derive(Debug)]
pub enum Entity<T: Transport> {
    /// Climate entity.
    Climate(ClimateEntity<T>),
    /// Light entity.
    Light(LightEntity<T>),
    /// Sensor entity.
    Sensor(SensorEntity<T>),
}

impl<T: Transport> Entity<T> {
    /// Creates the five entities of `device`, not yet attached.
    #[must_use]
    pub fn for_device(
        device: &Arc<Device<T>>,
        coordinator: &UpdateCoordinator<T>,
        events: &EventBus,
    ) -> Vec<Self> {
        let mut entities = vec![
            Self::Climate(ClimateEntity::new(device, coordinator, events)),
            Self::Light(LightEntity::new(device, coordinator, events)),
        ];
        entities.extend(
            SensorKind::ALL
                .into_iter()
                .map(|kind| Self::Sensor(SensorEntity::new(device, coordinator, events, kind))),
        );
        entities
    }

    /// Platform of the entity.
    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            Self::Climate(_) => Platform::Climate,
            Self::Light(_) => Platform::Light,
            Self::Sensor(_) => Platform::Sensor,
        }
    }

    /// Unique ID.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        self.base().unique_id()
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.base().name()
    }

    /// Device registry information.
    #[must_use]
    pub fn device_info(&self) -> &DeviceInfo {
        self.base().info()
    }

    /// Returns `false` while the last coordinator pass failed.
    #[must_use]
    pub fn available(&self) -> bool {
        self.base().available()
    }

    /// Starts publishing a re-render request after every successful
    /// coordinator pass. Attaching twice is a no-op.
    pub fn attach(&self) {
        self.base().attach();
    }

    /// Stops listening to the coordinator.
    ///
    /// Returns `false` if the entity was not attached.
    pub fn detach(&self) -> bool {
        self.base().detach()
    }

    /// Returns `true` while attached to the coordinator.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.base().is_attached()
    }

    /// Returns the climate entity, if this is one.
    #[must_use]
    pub fn as_climate(&self) -> Option<&ClimateEntity<T>> {
        match self {
            Self::Climate(entity) => Some(entity),
            _ => None,
        }
    }

    /// Returns the light entity, if this is one.
    #[must_use]
    pub fn as_light(&self) -> Option<&LightEntity<T>> {
        match self {
            Self::Light(entity) => Some(entity),
            _ => None,
        }
    }

    /// Returns the sensor entity, if this is one.
    #[must_use]
    pub fn as_sensor(&self) -> Option<&SensorEntity<T>> {
        match self {
            Self::Sensor(entity) => Some(entity),
            _ => None,
        }
    }

    fn base(&self) -> &EntityBase<T> {
        match self {
            Self::Climate(entity) => entity.base(),
            Self::Light(entity) => entity.base(),
            Self::Sensor(entity) => entity.base(),
        }
    }
}
