// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state snapshot.

use serde::{Deserialize, Serialize};

use crate::types::{DeviceId, HvacMode, Mode, PowerDraw};

use super::StateUpdate;

/// Last known state of a thermostat.
///
/// A snapshot is always replaced as a whole by a refresh, so its fields are
/// consistent with each other: they all come from the same remote read.
/// Readings the service did not report are `None`.
///
/// # Examples
///
/// ```
/// use themo_lib::state::DeviceState;
/// use themo_lib::types::Mode;
///
/// let state: DeviceState = serde_json::from_str(r#"{
///     "DeviceName": "Bathroom",
///     "Mode": "Manual",
///     "ManualTemperature": 24.0,
///     "Lights": true
/// }"#).unwrap();
///
/// assert_eq!(state.name(), "Bathroom");
/// assert_eq!(state.mode(), &Mode::Manual);
/// assert_eq!(state.manual_temperature(), Some(24.0));
/// assert!(state.lights());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeviceState {
    /// Display name.
    #[serde(rename = "DeviceName")]
    name: String,
    /// Operating mode.
    mode: Mode,
    /// Target temperature used in manual mode.
    manual_temperature: Option<f32>,
    /// Temperature the thermostat regulates on.
    #[serde(rename = "Info")]
    measured_temperature: Option<f32>,
    /// Floor sensor reading.
    floor_temperature: Option<f32>,
    /// Room sensor reading.
    room_temperature: Option<f32>,
    /// Current draw as a fraction of `max_power`.
    power: f32,
    /// Rated maximum power in kW.
    max_power: f32,
    /// Light relay state.
    lights: bool,
    /// Name of the schedule in use.
    active_schedule: Option<String>,
    /// Names of every schedule configured on the device.
    available_schedules: Vec<String>,
    /// Firmware version.
    #[serde(rename = "SWVersion")]
    sw_version: Option<String>,
}

impl DeviceState {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty snapshot carrying only a display name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operating mode as reported by the service.
    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Operating mode translated for the host.
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        HvacMode::from(&self.mode)
    }

    /// Manual target temperature in °C.
    #[must_use]
    pub fn manual_temperature(&self) -> Option<f32> {
        self.manual_temperature
    }

    /// Measured temperature in °C.
    #[must_use]
    pub fn measured_temperature(&self) -> Option<f32> {
        self.measured_temperature
    }

    /// Floor temperature in °C.
    #[must_use]
    pub fn floor_temperature(&self) -> Option<f32> {
        self.floor_temperature
    }

    /// Room temperature in °C.
    #[must_use]
    pub fn room_temperature(&self) -> Option<f32> {
        self.room_temperature
    }

    /// Current power draw.
    #[must_use]
    pub fn power_draw(&self) -> PowerDraw {
        PowerDraw::new(self.power, self.max_power)
    }

    /// Light relay state.
    #[must_use]
    pub fn lights(&self) -> bool {
        self.lights
    }

    /// Active schedule name.
    #[must_use]
    pub fn active_schedule(&self) -> Option<&str> {
        self.active_schedule.as_deref()
    }

    /// Names of the schedules available on the device.
    #[must_use]
    pub fn available_schedules(&self) -> &[String] {
        &self.available_schedules
    }

    /// Firmware version.
    #[must_use]
    pub fn sw_version(&self) -> Option<&str> {
        self.sw_version.as_deref()
    }

    /// Replaces the display name.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    // ========== Builders (fixtures and fakes) ==========

    /// Sets the operating mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the manual target temperature.
    #[must_use]
    pub fn with_manual_temperature(mut self, celsius: f32) -> Self {
        self.manual_temperature = Some(celsius);
        self
    }

    /// Sets the measured, floor and room temperatures.
    #[must_use]
    pub fn with_temperatures(mut self, measured: f32, floor: f32, room: f32) -> Self {
        self.measured_temperature = Some(measured);
        self.floor_temperature = Some(floor);
        self.room_temperature = Some(room);
        self
    }

    /// Sets the power draw.
    #[must_use]
    pub fn with_power(mut self, fraction: f32, max_power_kw: f32) -> Self {
        self.power = fraction;
        self.max_power = max_power_kw;
        self
    }

    /// Sets the light relay state.
    #[must_use]
    pub fn with_lights(mut self, on: bool) -> Self {
        self.lights = on;
        self
    }

    /// Sets the available schedules and the active one.
    #[must_use]
    pub fn with_schedules<I, S>(mut self, available: I, active: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_schedules = available.into_iter().map(Into::into).collect();
        self.active_schedule = active.map(str::to_string);
        self
    }

    /// Sets the firmware version.
    #[must_use]
    pub fn with_sw_version(mut self, version: impl Into<String>) -> Self {
        self.sw_version = Some(version.into());
        self
    }

    // ========== Write-through ==========

    /// Applies an accepted write to the snapshot.
    ///
    /// Returns `true` if any field changed.
    pub fn apply(&mut self, update: &StateUpdate) -> bool {
        let mut changed = false;

        if let Some(mode) = update.mode_value()
            && self.mode != *mode
        {
            self.mode = mode.clone();
            changed = true;
        }
        if let Some(temperature) = update.manual_temperature_value()
            && self.manual_temperature != Some(temperature)
        {
            self.manual_temperature = Some(temperature);
            changed = true;
        }
        if let Some(schedule) = update.active_schedule_value()
            && self.active_schedule.as_deref() != Some(schedule)
        {
            self.active_schedule = Some(schedule.to_string());
            changed = true;
        }
        if let Some(lights) = update.lights_value()
            && self.lights != lights
        {
            self.lights = lights;
            changed = true;
        }

        changed
    }
}

/// One entry of the device listing: identity plus initial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Remote identifier.
    #[serde(rename = "DeviceID")]
    pub id: DeviceId,
    /// State at enumeration time.
    #[serde(flatten)]
    pub state: DeviceState,
}
