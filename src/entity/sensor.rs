// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only measurement entities.

use std::fmt;
use std::sync::Arc;

use super::DeviceInfo;
use super::base::EntityBase;
use crate::coordinator::UpdateCoordinator;
use crate::device::Device;
use crate::event::EventBus;
use crate::transport::Transport;

/// Measurement a [`SensorEntity`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Heating power draw in watts.
    Power,
    /// Floor temperature.
    FloorTemperature,
    /// Room temperature.
    RoomTemperature,
}

impl SensorKind {
    /// Every sensor kind, in creation order.
    pub const ALL: [Self; 3] = [Self::Power, Self::FloorTemperature, Self::RoomTemperature];

    /// Suffix of the unique ID.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::FloorTemperature => "floor_temperature",
            Self::RoomTemperature => "room_temperature",
        }
    }

    /// Suffix of the display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Power => "Power",
            Self::FloorTemperature => "floor temperature",
            Self::RoomTemperature => "room temperature",
        }
    }

    /// Unit of measurement.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Power => "W",
            Self::FloorTemperature | Self::RoomTemperature => "°C",
        }
    }

    /// Device class.
    #[must_use]
    pub const fn device_class(self) -> SensorDeviceClass {
        match self {
            Self::Power => SensorDeviceClass::Power,
            Self::FloorTemperature | Self::RoomTemperature => SensorDeviceClass::Temperature,
        }
    }
}

/// Kind of quantity a sensor measures, as understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorDeviceClass {
    /// Electrical power.
    Power,
    /// Temperature.
    Temperature,
}

impl SensorDeviceClass {
    /// Host name of the class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Temperature => "temperature",
        }
    }
}

impl fmt::Display for SensorDeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sensor entity of a thermostat (`{id}_{kind}`).
pub struct SensorEntity<T: Transport> {
    base: EntityBase<T>,
    kind: SensorKind,
}

impl<T: Transport> SensorEntity<T> {
    /// State class of every sensor.
    pub const STATE_CLASS: &'static str = "measurement";

    /// Creates the `kind` sensor of `device`.
    #[must_use]
    pub fn new(
        device: &Arc<Device<T>>,
        coordinator: &UpdateCoordinator<T>,
        events: &EventBus,
        kind: SensorKind,
    ) -> Self {
        Self {
            base: EntityBase::new(
                device,
                coordinator,
                events,
                format!("{}_{}", device.id(), kind.key()),
                format!("{} {}", device.name(), kind.label()),
            ),
            kind,
        }
    }

    /// Measurement reported by this sensor.
    #[must_use]
    pub fn kind(&self) -> SensorKind {
        self.kind
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

    /// Unit of measurement.
    #[must_use]
    pub fn unit(&self) -> &'static str {
        self.kind.unit()
    }

    /// Device class.
    #[must_use]
    pub fn device_class(&self) -> SensorDeviceClass {
        self.kind.device_class()
    }

    /// Current reading, `None` if the device did not report it.
    #[must_use]
    pub fn native_value(&self) -> Option<f32> {
        let device = self.base.device();
        match self.kind {
            SensorKind::Power => Some(device.power_draw().watts()),
            SensorKind::FloorTemperature => device.floor_temperature(),
            SensorKind::RoomTemperature => device.room_temperature(),
        }
    }

    pub(crate) fn base(&self) -> &EntityBase<T> {
        &self.base
    }
}

impl<T: Transport> fmt::Debug for SensorEntity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorEntity")
            .field("kind", &self.kind)
            .field("base", &self.base)
            .finish()
    }
}
