// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device proxies.
//!
//! A [`Device`] is the in-memory stand-in for one physical thermostat. It
//! caches the last state read from the service and exposes typed accessors
//! that only ever read that cache. Mutators write through to the service
//! first and update the cache once the write is accepted.
//!
//! ```no_run
//! use std::sync::Arc;
//! use themo_lib::device::Device;
//! use themo_lib::state::DeviceState;
//! use themo_lib::transport::ThemoClient;
//!
//! # async fn example() -> themo_lib::Result<()> {
//! let client = Arc::new(ThemoClient::new()?);
//! client.authenticate("user@example.com", "secret").await?;
//!
//! let device = Device::new("1234".into(), DeviceState::named("Bathroom"), client);
//! device.update_state().await?;
//! device.set_lights(true).await?;
//! assert!(device.lights());
//! # Ok(())
//! # }
//! ```

mod device_set;

pub use device_set::DeviceSet;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, ValueError};
use crate::state::{DeviceState, StateUpdate};
use crate::transport::Transport;
use crate::types::{DeviceId, HvacMode, Mode, PowerDraw, Temperature};

/// Proxy for one remote thermostat.
///
/// The cached snapshot is replaced as a unit by [`update_state`](Self::update_state),
/// so readers never observe a mix of two remote reads. When a read fails the
/// previous snapshot stays in place.
pub struct Device<T> {
    id: DeviceId,
    transport: Arc<T>,
    state: RwLock<DeviceState>,
}

impl<T: Transport> Device<T> {
    /// Creates a proxy with an initial snapshot.
    #[must_use]
    pub fn new(id: DeviceId, initial: DeviceState, transport: Arc<T>) -> Self {
        Self {
            id,
            transport,
            state: RwLock::new(initial),
        }
    }

    /// Returns the remote identifier.
    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    /// Returns a copy of the cached snapshot.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state.read().clone()
    }

    /// Reads the cached snapshot without copying it.
    pub fn with_state<R>(&self, f: impl FnOnce(&DeviceState) -> R) -> R {
        f(&self.state.read())
    }

    // ========== Cached accessors ==========

    /// Display name.
    #[must_use]
    pub fn name(&self) -> String {
        self.with_state(|s| s.name().to_string())
    }

    /// Operating mode as reported by the service.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.with_state(|s| s.mode().clone())
    }

    /// Operating mode translated for the host.
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        self.with_state(DeviceState::hvac_mode)
    }

    /// Manual target temperature in °C.
    #[must_use]
    pub fn manual_temperature(&self) -> Option<f32> {
        self.with_state(DeviceState::manual_temperature)
    }

    /// Measured temperature in °C.
    #[must_use]
    pub fn measured_temperature(&self) -> Option<f32> {
        self.with_state(DeviceState::measured_temperature)
    }

    /// Floor temperature in °C.
    #[must_use]
    pub fn floor_temperature(&self) -> Option<f32> {
        self.with_state(DeviceState::floor_temperature)
    }

    /// Room temperature in °C.
    #[must_use]
    pub fn room_temperature(&self) -> Option<f32> {
        self.with_state(DeviceState::room_temperature)
    }

    /// Current power draw.
    #[must_use]
    pub fn power_draw(&self) -> PowerDraw {
        self.with_state(DeviceState::power_draw)
    }

    /// Light relay state.
    #[must_use]
    pub fn lights(&self) -> bool {
        self.with_state(DeviceState::lights)
    }

    /// Active schedule name.
    #[must_use]
    pub fn active_schedule(&self) -> Option<String> {
        self.with_state(|s| s.active_schedule().map(str::to_string))
    }

    /// Names of the schedules available on the device.
    #[must_use]
    pub fn available_schedules(&self) -> Vec<String> {
        self.with_state(|s| s.available_schedules().to_vec())
    }

    /// Firmware version.
    #[must_use]
    pub fn sw_version(&self) -> Option<String> {
        self.with_state(|s| s.sw_version().map(str::to_string))
    }

    // ========== Remote operations ==========

    /// Fetches the latest remote state and replaces the cached snapshot.
    ///
    /// If the service omits the display name, the cached one is kept.
    ///
    /// # Errors
    ///
    /// Returns the transport error unchanged; the cached snapshot is left
    /// untouched.
    pub async fn update_state(&self) -> Result<(), Error> {
        let mut fresh = self.transport.fetch_state(&self.id).await?;

        let mut state = self.state.write();
        if fresh.name().is_empty() {
            fresh = fresh.renamed(state.name());
        }
        *state = fresh;
        drop(state);

        tracing::debug!(device_id = %self.id, "Device state updated");
        Ok(())
    }

    /// Sets the operating mode.
    ///
    /// # Errors
    ///
    /// Returns error if the service rejects the write.
    pub async fn set_mode(&self, mode: Mode) -> Result<(), Error> {
        self.write(StateUpdate::mode(mode)).await
    }

    /// Sets the manual target temperature.
    ///
    /// # Errors
    ///
    /// Returns error if the service rejects the write.
    pub async fn set_manual_temperature(&self, temperature: Temperature) -> Result<(), Error> {
        self.write(StateUpdate::manual_temperature(temperature))
            .await
    }

    /// Activates a schedule.
    ///
    /// When the device reported its schedules, the name must be one of them.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownSchedule` for a schedule the device does
    /// not offer, or an error if the service rejects the write.
    pub async fn set_active_schedule(&self, name: &str) -> Result<(), Error> {
        let known = self.with_state(|s| {
            s.available_schedules().is_empty()
                || s.available_schedules().iter().any(|schedule| schedule == name)
        });
        if !known {
            return Err(ValueError::UnknownSchedule(name.to_string()).into());
        }

        self.write(StateUpdate::active_schedule(name)).await
    }

    /// Switches the light relay.
    ///
    /// # Errors
    ///
    /// Returns error if the service rejects the write.
    pub async fn set_lights(&self, on: bool) -> Result<(), Error> {
        self.write(StateUpdate::lights(on)).await
    }

    /// Writes an update remotely, then applies it to the cache.
    async fn write(&self, update: StateUpdate) -> Result<(), Error> {
        self.transport.write_state(&self.id, &update).await?;

        let changed = self.state.write().apply(&update);
        tracing::debug!(device_id = %self.id, changed, "Device state written");
        Ok(())
    }
}

impl<T> std::fmt::Debug for Device<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .field("name", &self.state.read().name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct StubTransport {
        remote: Mutex<DeviceState>,
        fail_reads: Mutex<bool>,
        reject_writes: Mutex<bool>,
    }

    impl Transport for StubTransport {
        async fn fetch_state(&self, _id: &DeviceId) -> Result<DeviceState, Error> {
            if *self.fail_reads.lock() {
                return Err(ApiError::ConnectTimeout("stub".to_string()).into());
            }
            Ok(self.remote.lock().clone())
        }

        async fn write_state(&self, _id: &DeviceId, update: &StateUpdate) -> Result<(), Error> {
            if *self.reject_writes.lock() {
                return Err(ApiError::Status {
                    status: 500,
                    reason: "Internal Server Error".to_string(),
                }
                .into());
            }
            self.remote.lock().apply(update);
            Ok(())
        }
    }

    fn device(transport: &Arc<StubTransport>) -> Device<StubTransport> {
        Device::new(
            DeviceId::new("1"),
            DeviceState::named("Bathroom").with_schedules(["Home", "Away"], Some("Home")),
            Arc::clone(transport),
        )
    }

    #[tokio::test]
    async fn update_replaces_snapshot() {
        let transport = Arc::new(StubTransport::default());
        *transport.remote.lock() = DeviceState::named("Bathroom")
            .with_mode(Mode::Manual)
            .with_temperatures(21.0, 24.0, 20.0);
        let device = device(&transport);

        device.update_state().await.unwrap();

        assert_eq!(device.hvac_mode(), HvacMode::Heat);
        assert_eq!(device.floor_temperature(), Some(24.0));
        // The remote snapshot had no schedules, so those are gone too.
        assert!(device.available_schedules().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_name_when_service_omits_it() {
        let transport = Arc::new(StubTransport::default());
        let device = device(&transport);

        device.update_state().await.unwrap();

        assert_eq!(device.name(), "Bathroom");
    }

    #[tokio::test]
    async fn failed_update_keeps_previous_snapshot() {
        let transport = Arc::new(StubTransport::default());
        *transport.fail_reads.lock() = true;
        let device = device(&transport);
        let before = device.state();

        let err = device.update_state().await.unwrap_err();

        assert!(err.is_connect_timeout());
        assert_eq!(device.state(), before);
    }

    #[tokio::test]
    async fn write_through_updates_cache() {
        let transport = Arc::new(StubTransport::default());
        let device = device(&transport);

        device.set_lights(true).await.unwrap();

        assert!(device.lights());
        assert!(transport.remote.lock().lights());
    }

    #[tokio::test]
    async fn rejected_write_leaves_cache_unchanged() {
        let transport = Arc::new(StubTransport::default());
        *transport.reject_writes.lock() = true;
        let device = device(&transport);

        let result = device.set_mode(Mode::Manual).await;

        assert!(result.is_err());
        assert_eq!(device.mode(), Mode::Off);
    }

    #[tokio::test]
    async fn unknown_schedule_is_rejected_locally() {
        let transport = Arc::new(StubTransport::default());
        let device = device(&transport);

        let err = device.set_active_schedule("Holiday").await.unwrap_err();

        assert!(matches!(err, Error::Value(ValueError::UnknownSchedule(_))));
        assert_eq!(device.active_schedule().as_deref(), Some("Home"));
    }

    #[tokio::test]
    async fn known_schedule_is_written() {
        let transport = Arc::new(StubTransport::default());
        let device = device(&transport);

        device.set_active_schedule("Away").await.unwrap();

        assert_eq!(device.active_schedule().as_deref(), Some("Away"));
    }
}
