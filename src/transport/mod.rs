// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote access to thermostat state.
//!
//! The [`Transport`] trait is the seam between device proxies and the remote
//! service: every proxy reads and writes its state through it. With the
//! `http` feature enabled, [`ThemoClient`] implements it against the cloud
//! API.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{ClientConfig, ThemoClient};

use std::future::Future;

use crate::error::Error;
use crate::state::{DeviceState, StateUpdate};
use crate::types::DeviceId;

/// Address of the Themo cloud service.
pub const DEFAULT_BASE_URL: &str = "https://app.themo.io";

/// Reads and writes the remote state of individual devices.
///
/// Implementations perform their own network I/O and enforce their own
/// timeouts. A device that cannot be reached in time must be reported with
/// an error for which [`Error::is_connect_timeout`] returns `true`.
pub trait Transport: Send + Sync + 'static {
    /// Fetches the full current state of a device.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    fn fetch_state(&self, id: &DeviceId)
    -> impl Future<Output = Result<DeviceState, Error>> + Send;

    /// Writes a partial update to a device.
    ///
    /// # Errors
    ///
    /// Returns an error if the service does not accept the write.
    fn write_state(
        &self,
        id: &DeviceId,
        update: &StateUpdate,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}
