// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat state snapshot and write payloads.
//!
//! [`DeviceState`] is the full snapshot read from the remote service and
//! cached by each device proxy. [`StateUpdate`] is a partial write sent to
//! the service; once the service accepts it, the same update is applied to
//! the cached snapshot.
//!
//! # Examples
//!
//! ```
//! use themo_lib::state::{DeviceState, StateUpdate};
//!
//! let mut state = DeviceState::new();
//!
//! // Apply returns true if the snapshot actually changed
//! assert!(state.apply(&StateUpdate::lights(true)));
//! assert!(state.lights());
//!
//! // Applying the same update again returns false
//! assert!(!state.apply(&StateUpdate::lights(true)));
//! ```

mod device_state;
mod state_update;

pub use device_state::{DeviceDescriptor, DeviceState};
pub use state_update::StateUpdate;
