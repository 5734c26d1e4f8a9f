// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target temperature type.

use std::fmt;

use crate::error::ValueError;

/// Target temperature in degrees Celsius.
///
/// Only used for values written to a device; readings coming back from the
/// service are plain `f32`. Any finite value is accepted, the device decides
/// which setpoints it supports.
///
/// # Examples
///
/// ```
/// use themo_lib::types::Temperature;
///
/// let t = Temperature::new(21.5).unwrap();
/// assert_eq!(t.celsius(), 21.5);
///
/// assert!(Temperature::new(40.0).is_ok());
/// assert!(Temperature::new(f32::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Temperature(f32);

impl Temperature {
    /// Creates a target temperature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NonFiniteTemperature` for NaN or infinities.
    pub fn new(celsius: f32) -> Result<Self, ValueError> {
        if !celsius.is_finite() {
            return Err(ValueError::NonFiniteTemperature);
        }
        Ok(Self(celsius))
    }

    /// Returns the value in degrees Celsius.
    #[must_use]
    pub const fn celsius(&self) -> f32 {
        self.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} °C", self.0)
    }
}

impl TryFrom<f32> for Temperature {
    type Error = ValueError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
