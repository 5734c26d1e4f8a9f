// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power draw of a thermostat's heating element.

/// Instantaneous power draw.
///
/// The service reports the draw as a fraction of the heater's rated maximum,
/// and the rated maximum in kilowatts.
///
/// # Examples
///
/// ```
/// use themo_lib::types::PowerDraw;
///
/// let draw = PowerDraw::new(0.5, 2.0);
/// assert_eq!(draw.watts(), 1000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PowerDraw {
    fraction: f32,
    max_power_kw: f32,
}

impl PowerDraw {
    /// Creates a power draw from the reported fraction and rated maximum.
    #[must_use]
    pub const fn new(fraction: f32, max_power_kw: f32) -> Self {
        Self {
            fraction,
            max_power_kw,
        }
    }

    /// Fraction of the rated maximum currently drawn (0.0 - 1.0).
    #[must_use]
    pub const fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Rated maximum power in kilowatts.
    #[must_use]
    pub const fn max_power_kw(&self) -> f32 {
        self.max_power_kw
    }

    /// Current draw in watts.
    #[must_use]
    pub fn watts(&self) -> f32 {
        self.fraction * self.max_power_kw * 1e3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_heater_draws_nothing() {
        assert_eq!(PowerDraw::new(0.0, 2.0).watts(), 0.0);
    }

    #[test]
    fn full_draw_equals_rating() {
        assert_eq!(PowerDraw::new(1.0, 1.5).watts(), 1500.0);
    }
}
