// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate entity: HVAC mode, target temperature and schedules.

use std::ops::BitOr;
use std::sync::Arc;

use super::DeviceInfo;
use super::base::EntityBase;
use crate::coordinator::UpdateCoordinator;
use crate::device::Device;
use crate::error::Error;
use crate::event::EventBus;
use crate::transport::Transport;
use crate::types::{HvacMode, Temperature};

/// Unit of every temperature the climate entity reports.
pub const TEMPERATURE_UNIT: &str = "°C";

/// Set of actions a climate entity currently supports.
///
/// Values match the host's climate feature flags.
///
/// # Examples
///
/// ```
/// use themo_lib::entity::ClimateFeatures;
///
/// let features = ClimateFeatures::TURN_ON | ClimateFeatures::TURN_OFF;
/// assert!(features.contains(ClimateFeatures::TURN_OFF));
/// assert!(!features.contains(ClimateFeatures::PRESET_MODE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClimateFeatures(u32);

impl ClimateFeatures {
    /// A target temperature can be set.
    pub const TARGET_TEMPERATURE: Self = Self(1);
    /// A preset (schedule) can be selected.
    pub const PRESET_MODE: Self = Self(16);
    /// The entity can be turned off.
    pub const TURN_OFF: Self = Self(128);
    /// The entity can be turned on.
    pub const TURN_ON: Self = Self(256);

    /// No features.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw flag value.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every flag of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ClimateFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Climate entity of a thermostat (`{id}_climate`).
pub struct ClimateEntity<T: Transport> {
    base: EntityBase<T>,
}

impl<T: Transport> ClimateEntity<T> {
    /// Creates the climate entity of `device`.
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
                format!("{}_climate", device.id()),
                device.name(),
            ),
        }
    }

    // ========== Attributes ==========

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

    /// Current HVAC mode.
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        self.base.device().hvac_mode()
    }

    /// Every HVAC mode the entity accepts.
    #[must_use]
    pub fn hvac_modes(&self) -> &'static [HvacMode] {
        &HvacMode::ALL
    }

    /// Measured temperature.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f32> {
        self.base.device().measured_temperature()
    }

    /// Manual target temperature.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f32> {
        self.base.device().manual_temperature()
    }

    /// Unit of the reported temperatures.
    #[must_use]
    pub fn temperature_unit(&self) -> &'static str {
        TEMPERATURE_UNIT
    }

    /// Active schedule.
    #[must_use]
    pub fn preset_mode(&self) -> Option<String> {
        self.base.device().active_schedule()
    }

    /// Available schedules.
    #[must_use]
    pub fn preset_modes(&self) -> Vec<String> {
        self.base.device().available_schedules()
    }

    /// Actions supported in the current HVAC mode.
    #[must_use]
    pub fn supported_features(&self) -> ClimateFeatures {
        let on_off = ClimateFeatures::TURN_ON | ClimateFeatures::TURN_OFF;
        match self.hvac_mode() {
            HvacMode::Auto => ClimateFeatures::PRESET_MODE | on_off,
            HvacMode::Heat => ClimateFeatures::TARGET_TEMPERATURE | on_off,
            HvacMode::Off => on_off,
        }
    }

    // ========== Actions ==========

    /// Sets the target temperature.
    ///
    /// Only applies in [`HvacMode::Heat`]; in any other mode, or without a
    /// temperature, nothing is written and `Ok(false)` is returned.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the temperature is not a finite number, or an
    /// error if the write fails. The device itself enforces its setpoint range.
    pub async fn set_temperature(&self, temperature: Option<f32>) -> Result<bool, Error> {
        let Some(celsius) = temperature else {
            return Ok(false);
        };
        if self.hvac_mode() != HvacMode::Heat {
            tracing::debug!(
                entity = %self.unique_id(),
                mode = %self.hvac_mode(),
                "Ignoring target temperature outside heat mode"
            );
            return Ok(false);
        }

        let temperature = Temperature::new(celsius)?;
        self.base
            .device()
            .set_manual_temperature(temperature)
            .await?;
        self.base.written();
        Ok(true)
    }

    /// Sets the HVAC mode.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<(), Error> {
        self.base.device().set_mode(mode.to_remote()).await?;
        self.base.written();
        Ok(())
    }

    /// Activates a schedule.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownSchedule` for a schedule the device does
    /// not offer, or an error if the write fails.
    pub async fn set_preset_mode(&self, preset: &str) -> Result<(), Error> {
        self.base.device().set_active_schedule(preset).await?;
        self.base.written();
        Ok(())
    }

    /// Turns heating on in manual mode.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    pub async fn turn_on(&self) -> Result<(), Error> {
        self.set_hvac_mode(HvacMode::Heat).await
    }

    /// Turns the thermostat off.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    pub async fn turn_off(&self) -> Result<(), Error> {
        self.set_hvac_mode(HvacMode::Off).await
    }

    pub(crate) fn base(&self) -> &EntityBase<T> {
        &self.base
    }
}

impl<T: Transport> std::fmt::Debug for ClimateEntity<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ClimateEntity").field(&self.base).finish()
    }
}
