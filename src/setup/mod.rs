// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration setup and teardown.
//!
//! [`Integration::setup`] authenticates, enumerates the account's devices,
//! runs a first refresh, creates and attaches every entity and starts the
//! periodic refresh. [`Integration::from_parts`] does the same over any
//! [`Transport`](crate::transport::Transport) the host already holds.
//!
//! ```no_run
//! use themo_lib::setup::{Integration, IntegrationConfig};
//!
//! # async fn example() -> Result<(), themo_lib::error::SetupError> {
//! let config = IntegrationConfig::new("user@example.com", "secret");
//! let integration = Integration::setup(&config).await?;
//!
//! let mut events = integration.subscribe_events();
//! while let Ok(event) = events.recv().await {
//!     println!("re-render {}", event.unique_id());
//! }
//!
//! integration.unload().await;
//! # Ok(())
//! # }
//! ```

mod config;
mod integration;

pub use config::IntegrationConfig;
#[cfg(feature = "http")]
pub use integration::validate_credentials;
pub use integration::{COORDINATOR_NAME, Integration};
