// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operating modes and their translation to host HVAC modes.
//!
//! The remote service reports one of `"Off"`, `"Manual"` or `"SLS"` (the
//! scheduled automatic mode). Hosts speak in terms of [`HvacMode`]. The
//! mapping is two-way for the three known modes; any other remote value is
//! shown to the host as [`HvacMode::Off`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Operating mode as reported by the remote service.
///
/// Unknown strings are preserved in [`Mode::Unknown`] instead of failing to
/// parse, so that a firmware update introducing a new mode never breaks a
/// refresh.
///
/// # Examples
///
/// ```
/// use themo_lib::types::Mode;
///
/// assert_eq!("SLS".parse::<Mode>().unwrap(), Mode::Scheduled);
/// assert_eq!(Mode::Manual.as_str(), "Manual");
/// assert_eq!("Boost".parse::<Mode>().unwrap(), Mode::Unknown("Boost".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mode {
    /// Heating disabled.
    #[default]
    Off,
    /// Holds the manual target temperature.
    Manual,
    /// Follows the active schedule.
    Scheduled,
    /// A mode this library does not know about.
    Unknown(String),
}

impl Mode {
    /// Returns the remote string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Off => "Off",
            Self::Manual => "Manual",
            Self::Scheduled => "SLS",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Mode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Off" => Self::Off,
            "Manual" => Self::Manual,
            "SLS" => Self::Scheduled,
            _ => Self::Unknown(s),
        }
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Mode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

/// HVAC mode as presented to the host.
///
/// # Examples
///
/// ```
/// use themo_lib::types::{HvacMode, Mode};
///
/// assert_eq!(HvacMode::from(&Mode::Manual), HvacMode::Heat);
/// assert_eq!(HvacMode::Auto.to_remote(), Mode::Scheduled);
///
/// // Unknown remote modes fall back to Off.
/// assert_eq!(HvacMode::from(&Mode::Unknown("Boost".into())), HvacMode::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HvacMode {
    /// Heating disabled.
    Off,
    /// Manual heating to a target temperature.
    Heat,
    /// Schedule-driven heating.
    Auto,
}

impl HvacMode {
    /// All HVAC modes a thermostat supports, in display order.
    pub const ALL: [Self; 3] = [Self::Off, Self::Heat, Self::Auto];

    /// Returns the host string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Heat => "heat",
            Self::Auto => "auto",
        }
    }

    /// Returns the remote mode this HVAC mode is written as.
    #[must_use]
    pub const fn to_remote(self) -> Mode {
        match self {
            Self::Off => Mode::Off,
            Self::Heat => Mode::Manual,
            Self::Auto => Mode::Scheduled,
        }
    }
}

impl From<&Mode> for HvacMode {
    fn from(mode: &Mode) -> Self {
        match mode {
            Mode::Manual => Self::Heat,
            Mode::Scheduled => Self::Auto,
            Mode::Off | Mode::Unknown(_) => Self::Off,
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HvacMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "heat" => Ok(Self::Heat),
            "auto" => Ok(Self::Auto),
            _ => Err(ValueError::UnsupportedHvacMode(s.to_string())),
        }
    }
}
