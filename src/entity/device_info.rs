// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device registry information shared by a device's entities.

use serde::Serialize;

use crate::device::Device;
use crate::transport::Transport;
use crate::types::DeviceId;

/// Integration domain used in device identifiers.
pub const DOMAIN: &str = "themo";

/// Manufacturer reported for every device.
pub const MANUFACTURER: &str = "Themo";

/// Model reported for every device.
pub const MODEL: &str = "Smart Thermostat";

/// Host-facing description of a physical device.
///
/// All entities of one thermostat carry the same `DeviceInfo`, which lets the
/// host group them under one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// `(domain, device id)` pair identifying the device.
    pub identifiers: (String, DeviceId),
    /// Display name.
    pub name: String,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Model name.
    pub model: String,
    /// Firmware version, if reported.
    pub sw_version: Option<String>,
}

impl DeviceInfo {
    /// Describes `device` from its cached snapshot.
    #[must_use]
    pub fn for_device<T: Transport>(device: &Device<T>) -> Self {
        Self {
            identifiers: (DOMAIN.to_string(), device.id().clone()),
            name: device.name(),
            manufacturer: MANUFACTURER.to_string(),
            model: MODEL.to_string(),
            sw_version: device.sw_version(),
        }
    }
}
