// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observer subscriptions.
//!
//! The update coordinator notifies its observers after every successful
//! refresh pass. Observers are plain closures held in an
//! [`ObserverRegistry`]; subscribing returns a [`Subscription`] handle that
//! removes the observer when dropped.
//!
//! # Usage
//!
//! ```no_run
//! use themo_lib::coordinator::UpdateCoordinator;
//! use themo_lib::transport::ThemoClient;
//!
//! # fn example(coordinator: &UpdateCoordinator<ThemoClient>) {
//! let subscription = coordinator.subscribe(|devices| {
//!     println!("{} devices refreshed", devices.len());
//! });
//!
//! // Later, stop listening
//! subscription.unsubscribe();
//! # }
//! ```

mod callback;

pub use callback::{ObserverRegistry, Subscription, SubscriptionId};
