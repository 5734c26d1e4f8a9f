// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The fixed collection of devices managed by one account.

use std::sync::Arc;

use super::Device;
use crate::state::DeviceDescriptor;
use crate::transport::Transport;
use crate::types::DeviceId;

/// Immutable, cheaply cloneable set of device proxies.
///
/// The set is established once at setup and never changes afterwards. Clones
/// share the same proxies.
pub struct DeviceSet<T> {
    devices: Arc<Vec<Arc<Device<T>>>>,
}

impl<T: Transport> DeviceSet<T> {
    /// Creates a set from existing proxies.
    #[must_use]
    pub fn new(devices: Vec<Arc<Device<T>>>) -> Self {
        Self {
            devices: Arc::new(devices),
        }
    }

    /// Creates one proxy per descriptor, all sharing `transport`.
    #[must_use]
    pub fn from_descriptors(descriptors: Vec<DeviceDescriptor>, transport: &Arc<T>) -> Self {
        let devices = descriptors
            .into_iter()
            .map(|d| Arc::new(Device::new(d.id, d.state, Arc::clone(transport))))
            .collect();
        Self::new(devices)
    }

    /// Finds a device by its remote identifier.
    #[must_use]
    pub fn get(&self, id: &DeviceId) -> Option<&Arc<Device<T>>> {
        self.devices.iter().find(|d| d.id() == id)
    }
}

impl<T> DeviceSet<T> {
    /// Iterates over the proxies in enumeration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Device<T>>> {
        self.devices.iter()
    }

    /// Number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns `true` if the account has no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl<T> Clone for DeviceSet<T> {
    fn clone(&self) -> Self {
        Self {
            devices: Arc::clone(&self.devices),
        }
    }
}

impl<'a, T> IntoIterator for &'a DeviceSet<T> {
    type Item = &'a Arc<Device<T>>;
    type IntoIter = std::slice::Iter<'a, Arc<Device<T>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> std::fmt::Debug for DeviceSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.devices.iter()).finish()
    }
}
