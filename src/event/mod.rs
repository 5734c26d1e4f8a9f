// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Re-render notifications for the host.
//!
//! Entities publish an [`EntityEvent`] on the integration's [`EventBus`]
//! whenever the host should re-read them: after an action wrote through to
//! the device, and after every successful coordinator pass.

mod entity_event;
mod event_bus;

pub use entity_event::EntityEvent;
pub use event_bus::EventBus;
