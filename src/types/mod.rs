// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Themo thermostat control.
//!
//! # Types
//!
//! - [`DeviceId`] - Stable remote identifier of a thermostat
//! - [`Mode`] - Operating mode as reported by the remote service
//! - [`HvacMode`] - Host-facing HVAC mode (Off/Heat/Auto)
//! - [`Temperature`] - Validated target temperature in degrees Celsius
//! - [`PowerDraw`] - Fractional power draw combined with the rated maximum

mod device_id;
mod mode;
mod power;
mod temperature;

pub use device_id::DeviceId;
pub use mode::{HvacMode, Mode};
pub use power::PowerDraw;
pub use temperature::Temperature;
