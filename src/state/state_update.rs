// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Partial state writes.

use serde::Serialize;

use crate::types::{Mode, Temperature};

/// A write of one or more settable fields.
///
/// Serializes to the partial JSON object the service expects; fields that are
/// not being written are omitted.
///
/// # Examples
///
/// ```
/// use themo_lib::state::StateUpdate;
///
/// let update = StateUpdate::lights(true);
/// assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"Lights":true}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manual_temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lights: Option<bool>,
}

impl StateUpdate {
    /// Writes the operating mode.
    #[must_use]
    pub fn mode(mode: Mode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    /// Writes the manual target temperature.
    #[must_use]
    pub fn manual_temperature(temperature: Temperature) -> Self {
        Self {
            manual_temperature: Some(temperature.celsius()),
            ..Self::default()
        }
    }

    /// Writes the active schedule.
    #[must_use]
    pub fn active_schedule(name: impl Into<String>) -> Self {
        Self {
            active_schedule: Some(name.into()),
            ..Self::default()
        }
    }

    /// Writes the light relay state.
    #[must_use]
    pub fn lights(on: bool) -> Self {
        Self {
            lights: Some(on),
            ..Self::default()
        }
    }

    /// Mode being written, if any.
    #[must_use]
    pub fn mode_value(&self) -> Option<&Mode> {
        self.mode.as_ref()
    }

    /// Returns `true` if the update writes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mode.is_none()
            && self.manual_temperature.is_none()
            && self.active_schedule.is_none()
            && self.lights.is_none()
    }

    pub(crate) fn manual_temperature_value(&self) -> Option<f32> {
        self.manual_temperature
    }

    pub(crate) fn active_schedule_value(&self) -> Option<&str> {
        self.active_schedule.as_deref()
    }

    pub(crate) fn lights_value(&self) -> Option<bool> {
        self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_serializes_as_remote_string() {
        let update = StateUpdate::mode(Mode::Scheduled);
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"Mode":"SLS"}"#);
    }

    #[test]
    fn temperature_serializes_as_number() {
        let update = StateUpdate::manual_temperature(Temperature::new(21.5).unwrap());
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"ManualTemperature":21.5}"#
        );
    }

    #[test]
    fn default_is_empty() {
        assert!(StateUpdate::default().is_empty());
        assert!(!StateUpdate::active_schedule("Away").is_empty());
    }
}
