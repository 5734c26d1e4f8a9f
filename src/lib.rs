// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Themo` Lib - keeps Themo smart thermostats in sync with a home-automation
//! host.
//!
//! Every thermostat on a Themo account is exposed as a set of entities
//! (climate control, light switch, power and temperature sensors). A single
//! [`UpdateCoordinator`] refreshes all devices periodically and tells the
//! entities when fresh data is available.
//!
//! # Features
//!
//! - **Single-flight refresh**: concurrent refresh requests share one pass
//! - **Failure isolation**: an unreachable device keeps its last snapshot
//!   without failing the pass for the others
//! - **Write-through actions**: mode, temperature, schedule and light
//!   changes are written to the service and reflected locally at once
//! - **HTTP client** (feature `http`, on by default) for the Themo cloud API
//!
//! # Quick Start
//!
//! ```no_run
//! use themo_lib::setup::{Integration, IntegrationConfig};
//! use themo_lib::types::HvacMode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), themo_lib::error::SetupError> {
//!     let config = IntegrationConfig::new("user@example.com", "secret");
//!     let integration = Integration::setup(&config).await?;
//!
//!     for entity in integration.entities() {
//!         if let Some(climate) = entity.as_climate() {
//!             println!("{}: {:?} °C", climate.name(), climate.current_temperature());
//!             climate.set_hvac_mode(HvacMode::Heat).await.ok();
//!         }
//!     }
//!
//!     integration.unload().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Building from parts
//!
//! [`Integration::from_parts`] takes any [`Transport`] together with the
//! enumerated devices:
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use themo_lib::setup::Integration;
//! use themo_lib::transport::ThemoClient;
//!
//! # async fn example() -> themo_lib::Result<()> {
//! let client = Arc::new(ThemoClient::new()?);
//! client.authenticate("user@example.com", "secret").await?;
//! let descriptors = client.get_all_devices().await?;
//!
//! let integration = Integration::from_parts(client, descriptors, Duration::from_secs(120)).await;
//! integration.coordinator().refresh_now().await?;
//! # Ok(())
//! # }
//! ```

pub mod coordinator;
pub mod device;
pub mod entity;
pub mod error;
pub mod event;
pub mod setup;
pub mod state;
pub mod subscription;
pub mod transport;
pub mod types;

pub use coordinator::{RefreshResult, RefreshSummary, UpdateCoordinator};
pub use device::{Device, DeviceSet};
pub use entity::{ClimateEntity, DeviceInfo, Entity, LightEntity, SensorEntity, SensorKind};
pub use error::{
    ApiError, Error, ParseError, RefreshError, Result, SetupError, SetupErrorKind, ValueError,
};
pub use event::{EntityEvent, EventBus};
pub use setup::{Integration, IntegrationConfig};
pub use state::{DeviceDescriptor, DeviceState, StateUpdate};
pub use subscription::{Subscription, SubscriptionId};
#[cfg(feature = "http")]
pub use transport::{ClientConfig, ThemoClient};
pub use transport::Transport;
pub use types::{DeviceId, HvacMode, Mode, PowerDraw, Temperature};
