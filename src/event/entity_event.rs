// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Re-render requests published by entities.

/// Request for the host to re-read an entity and re-render it.
///
/// Events carry no state; the host reads current values from the entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityEvent {
    /// An action on the entity wrote through to the device.
    StateWritten {
        /// Unique ID of the entity.
        unique_id: String,
    },

    /// The coordinator finished a successful refresh pass.
    CoordinatorUpdate {
        /// Unique ID of the entity.
        unique_id: String,
    },
}

impl EntityEvent {
    /// Creates a `StateWritten` event.
    #[must_use]
    pub fn state_written(unique_id: impl Into<String>) -> Self {
        Self::StateWritten {
            unique_id: unique_id.into(),
        }
    }

    /// Creates a `CoordinatorUpdate` event.
    #[must_use]
    pub fn coordinator_update(unique_id: impl Into<String>) -> Self {
        Self::CoordinatorUpdate {
            unique_id: unique_id.into(),
        }
    }

    /// Returns the unique ID of the entity to re-render.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        match self {
            Self::StateWritten { unique_id } | Self::CoordinatorUpdate { unique_id } => unique_id,
        }
    }

    /// Returns `true` for events caused by a local write.
    #[must_use]
    pub fn is_state_written(&self) -> bool {
        matches!(self, Self::StateWritten { .. })
    }
}
