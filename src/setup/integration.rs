// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration lifecycle: setup and unload.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::coordinator::UpdateCoordinator;
use crate::device::DeviceSet;
use crate::entity::{Entity, Platform};
use crate::event::{EntityEvent, EventBus};
use crate::state::DeviceDescriptor;
use crate::transport::Transport;

use super::IntegrationConfig;
#[cfg(feature = "http")]
use crate::error::{Error, SetupError};
#[cfg(feature = "http")]
use crate::transport::ThemoClient;

/// Name of the integration's coordinator.
pub const COORDINATOR_NAME: &str = "themo_device_update";

/// A running integration: devices, coordinator and entities.
///
/// Everything is created once at setup and lives until [`unload`](Self::unload)
/// or drop; devices added to the account later only appear after a new
/// setup.
pub struct Integration<T: Transport> {
    transport: Arc<T>,
    coordinator: UpdateCoordinator<T>,
    events: EventBus,
    entities: Vec<Entity<T>>,
}

impl<T: Transport> Integration<T> {
    /// Builds an integration over an already authenticated transport.
    ///
    /// Performs the first refresh before creating entities, so they have
    /// data as soon as they are attached. A failed first refresh is logged
    /// and the integration still starts; entities report themselves
    /// unavailable until a pass succeeds.
    ///
    /// `scan_interval` is raised to [`IntegrationConfig::MIN_SCAN_INTERVAL`]
    /// if shorter.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn from_parts(
        transport: Arc<T>,
        descriptors: Vec<DeviceDescriptor>,
        scan_interval: Duration,
    ) -> Self {
        let devices = DeviceSet::from_descriptors(descriptors, &transport);
        let coordinator = UpdateCoordinator::new(COORDINATOR_NAME, devices);

        if let Err(e) = coordinator.refresh_now().await {
            tracing::warn!(error = %e, "Initial refresh failed");
        }

        let events = EventBus::new();
        let entities: Vec<Entity<T>> = coordinator
            .devices()
            .iter()
            .flat_map(|device| Entity::for_device(device, &coordinator, &events))
            .collect();
        for entity in &entities {
            entity.attach();
        }

        if scan_interval < IntegrationConfig::MIN_SCAN_INTERVAL {
            tracing::warn!(
                requested = ?scan_interval,
                "Refresh interval too short, using the minimum"
            );
        }
        coordinator.start_periodic(scan_interval.max(IntegrationConfig::MIN_SCAN_INTERVAL));

        tracing::info!(
            devices = coordinator.devices().len(),
            entities = entities.len(),
            "Integration set up"
        );

        Self {
            transport,
            coordinator,
            events,
            entities,
        }
    }

    /// The shared transport.
    #[must_use]
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// The update coordinator.
    #[must_use]
    pub fn coordinator(&self) -> &UpdateCoordinator<T> {
        &self.coordinator
    }

    /// Devices enumerated at setup.
    #[must_use]
    pub fn devices(&self) -> &DeviceSet<T> {
        self.coordinator.devices()
    }

    /// Every entity, five per device.
    #[must_use]
    pub fn entities(&self) -> &[Entity<T>] {
        &self.entities
    }

    /// Entities of one platform.
    pub fn entities_for(&self, platform: Platform) -> impl Iterator<Item = &Entity<T>> {
        self.entities
            .iter()
            .filter(move |entity| entity.platform() == platform)
    }

    /// Finds an entity by unique ID.
    #[must_use]
    pub fn entity(&self, unique_id: &str) -> Option<&Entity<T>> {
        self.entities
            .iter()
            .find(|entity| entity.unique_id() == unique_id)
    }

    /// The bus entities publish re-render requests on.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns a receiver for re-render requests.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<EntityEvent> {
        self.events.subscribe()
    }

    /// Tears the integration down.
    ///
    /// Stops the periodic refresh, waiting for its task to exit, and detaches
    /// every entity from the coordinator.
    pub async fn unload(self) {
        self.coordinator.stop_periodic().await;

        let detached = self.entities.iter().filter(|entity| entity.detach()).count();

        tracing::info!(entities = detached, "Integration unloaded");
    }
}

impl<T: Transport> Drop for Integration<T> {
    fn drop(&mut self) {
        self.coordinator.cancel_periodic();
    }
}

impl<T: Transport> std::fmt::Debug for Integration<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Integration")
            .field("coordinator", &self.coordinator)
            .field("entities", &self.entities.len())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "http")]
impl Integration<ThemoClient> {
    /// Authenticates, enumerates devices and starts the integration.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] if the client cannot be created, the
    /// credentials are rejected, or the device listing fails. No entity is
    /// created in that case.
    pub async fn setup(config: &IntegrationConfig) -> Result<Self, SetupError> {
        let (client, descriptors) = connect(config).await.map_err(setup_failed)?;

        Ok(Self::from_parts(Arc::new(client), descriptors, config.scan_interval()).await)
    }
}

/// Checks that `config` holds valid credentials without setting anything up.
///
/// # Errors
///
/// Returns a [`SetupError`] whose [`kind`](SetupError::kind) tells bad
/// credentials apart from an unreachable service.
#[cfg(feature = "http")]
pub async fn validate_credentials(config: &IntegrationConfig) -> Result<(), SetupError> {
    let client = config
        .client_config()
        .into_client()
        .map_err(|e| setup_failed(e.into()))?;

    client
        .authenticate(config.username(), config.password())
        .await
        .map_err(setup_failed)
}

#[cfg(feature = "http")]
async fn connect(
    config: &IntegrationConfig,
) -> Result<(ThemoClient, Vec<DeviceDescriptor>), Error> {
    let client = config.client_config().into_client()?;
    client
        .authenticate(config.username(), config.password())
        .await?;
    let descriptors = client.get_all_devices().await?;
    Ok((client, descriptors))
}

#[cfg(feature = "http")]
fn setup_failed(error: Error) -> SetupError {
    let error = SetupError::from(error);
    match error.kind() {
        crate::error::SetupErrorKind::InvalidAuth => {
            tracing::error!(error = %error.inner(), "Failed to authenticate with Themo");
        }
        crate::error::SetupErrorKind::CannotConnect => {
            tracing::error!(error = %error.inner(), "Failed to connect to Themo");
        }
        crate::error::SetupErrorKind::Unknown => {
            tracing::error!(error = %error.inner(), "An unknown error occurred");
        }
    }
    error
}
