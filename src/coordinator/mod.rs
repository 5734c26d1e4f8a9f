// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Update coordination for the device set.
//!
//! The [`UpdateCoordinator`] is the single poller shared by every entity of
//! an integration. It refreshes all devices in one pass, makes sure only one
//! pass runs at a time, and notifies observers once per successful pass.
//!
//! # Refresh passes
//!
//! A pass calls [`Device::update_state`](crate::device::Device::update_state)
//! on every device concurrently and waits for all of them:
//!
//! - a device that cannot be reached before its connect timeout keeps its
//!   previous snapshot, a warning is logged and the pass carries on,
//! - any other error fails the pass: the last-success timestamp is not
//!   updated and observers are not notified.
//!
//! Callers of [`refresh_now`](UpdateCoordinator::refresh_now) that arrive
//! while a pass is running join that pass and receive its result.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use themo_lib::coordinator::UpdateCoordinator;
//! use themo_lib::device::DeviceSet;
//! use themo_lib::transport::ThemoClient;
//!
//! # async fn example() -> themo_lib::Result<()> {
//! let client = Arc::new(ThemoClient::new()?);
//! client.authenticate("user@example.com", "secret").await?;
//! let devices = DeviceSet::from_descriptors(client.get_all_devices().await?, &client);
//!
//! let coordinator = UpdateCoordinator::new("themo_device_update", devices);
//! let _subscription = coordinator.subscribe(|devices| {
//!     for device in devices {
//!         println!("{}: {:?}", device.name(), device.measured_temperature());
//!     }
//! });
//!
//! coordinator.refresh_now().await?;
//! coordinator.start_periodic(Duration::from_secs(120));
//! # Ok(())
//! # }
//! ```

mod periodic;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared, join_all};
use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::device::DeviceSet;
use crate::error::RefreshError;
use crate::subscription::{ObserverRegistry, Subscription};
use crate::transport::Transport;
use crate::types::DeviceId;

use periodic::PeriodicTask;

/// Outcome of a refresh pass, shared by every caller that joined it.
pub type RefreshResult = std::result::Result<RefreshSummary, RefreshError>;

type SharedPass = Shared<BoxFuture<'static, RefreshResult>>;

/// Summary of a successful refresh pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshSummary {
    updated: usize,
    stale: Vec<DeviceId>,
    finished_at: DateTime<Utc>,
}

impl RefreshSummary {
    /// Number of devices whose snapshot was refreshed.
    #[must_use]
    pub fn updated(&self) -> usize {
        self.updated
    }

    /// Devices that timed out and kept their previous snapshot.
    #[must_use]
    pub fn stale(&self) -> &[DeviceId] {
        &self.stale
    }

    /// Returns `true` if every device was refreshed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stale.is_empty()
    }

    /// When the pass finished.
    #[must_use]
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }
}

/// Periodic, single-flight refresher for a [`DeviceSet`].
///
/// Cloning is cheap; clones drive the same coordinator.
pub struct UpdateCoordinator<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    name: String,
    devices: DeviceSet<T>,
    observers: Arc<ObserverRegistry<DeviceSet<T>>>,
    in_flight: Mutex<Option<SharedPass>>,
    last_success: RwLock<Option<DateTime<Utc>>>,
    last_pass_ok: AtomicBool,
    passes: AtomicU64,
    periodic: Mutex<Option<PeriodicTask>>,
}

impl<T: Transport> UpdateCoordinator<T> {
    /// Creates a coordinator for `devices`. No refresh is performed.
    #[must_use]
    pub fn new(name: impl Into<String>, devices: DeviceSet<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                devices,
                observers: Arc::new(ObserverRegistry::new()),
                in_flight: Mutex::new(None),
                last_success: RwLock::new(None),
                last_pass_ok: AtomicBool::new(false),
                passes: AtomicU64::new(0),
                periodic: Mutex::new(None),
            }),
        }
    }

    /// Runs a refresh pass, or joins the one already running.
    ///
    /// The pass runs on its own task, so it completes and notifies observers
    /// even if the caller stops waiting for it.
    ///
    /// # Errors
    ///
    /// Returns `RefreshError::Device` if a device failed with anything other
    /// than a connect timeout, or `RefreshError::Aborted` if the pass task
    /// panicked.
    pub async fn refresh_now(&self) -> RefreshResult {
        let pass = {
            let mut slot = self.inner.in_flight.lock();
            if let Some(pass) = slot.as_ref() {
                tracing::debug!(coordinator = %self.inner.name, "Joining in-flight refresh");
                pass.clone()
            } else {
                let inner = Arc::clone(&self.inner);
                let handle = tokio::spawn(async move {
                    let _slot = InFlightSlot(&inner);
                    inner.run_pass().await
                });
                let pass = async move {
                    handle
                        .await
                        .unwrap_or_else(|e| Err(RefreshError::Aborted(e.to_string())))
                }
                .boxed()
                .shared();
                *slot = Some(pass.clone());
                pass
            }
        };

        pass.await
    }

    /// Registers an observer called with the device set after every
    /// successful pass.
    ///
    /// Nothing is replayed on subscription. Dropping the returned handle
    /// unsubscribes.
    pub fn subscribe<F>(&self, observer: F) -> Subscription<DeviceSet<T>>
    where
        F: Fn(&DeviceSet<T>) + Send + Sync + 'static,
    {
        self.inner.observers.subscribe_scoped(observer)
    }

    /// Starts refreshing every `interval`, replacing any running schedule.
    ///
    /// The first automatic pass happens one interval from now. A zero
    /// interval is ignored.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_periodic(&self, interval: Duration) {
        if interval.is_zero() {
            tracing::warn!(coordinator = %self.inner.name, "Ignoring zero refresh interval");
            return;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(periodic::refresh_task(
            Arc::downgrade(&self.inner),
            interval,
            cancel.clone(),
        ));

        let previous = self
            .inner
            .periodic
            .lock()
            .replace(PeriodicTask::new(cancel, handle));
        if let Some(previous) = previous {
            previous.cancel();
        }

        tracing::info!(
            coordinator = %self.inner.name,
            interval_secs = interval.as_secs_f64(),
            "Periodic refresh started"
        );
    }

    /// Stops the periodic schedule and waits for its task to exit.
    ///
    /// A pass started by the schedule before the stop still completes and
    /// notifies observers. Returns `false` if no schedule was running.
    pub async fn stop_periodic(&self) -> bool {
        let task = self.inner.periodic.lock().take();
        let Some(task) = task else {
            return false;
        };

        task.stop().await;
        tracing::info!(coordinator = %self.inner.name, "Periodic refresh stopped");
        true
    }

    /// Signals the periodic schedule to stop without waiting for its task.
    ///
    /// Returns `false` if no schedule was running.
    pub fn cancel_periodic(&self) -> bool {
        let task = self.inner.periodic.lock().take();
        let Some(task) = task else {
            return false;
        };

        task.cancel();
        tracing::info!(coordinator = %self.inner.name, "Periodic refresh cancelled");
        true
    }

    /// Returns `true` while a periodic schedule is active.
    #[must_use]
    pub fn is_periodic_running(&self) -> bool {
        self.inner
            .periodic
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_cancelled())
    }
}

impl<T> UpdateCoordinator<T> {
    /// Coordinator name used in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The coordinated device set.
    #[must_use]
    pub fn devices(&self) -> &DeviceSet<T> {
        &self.inner.devices
    }

    /// Completion time of the last successful pass.
    #[must_use]
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        *self.inner.last_success.read()
    }

    /// Returns `true` if the most recent pass succeeded.
    #[must_use]
    pub fn last_update_success(&self) -> bool {
        self.inner.last_pass_ok.load(Ordering::Acquire)
    }

    /// Number of passes started so far.
    #[must_use]
    pub fn pass_count(&self) -> u64 {
        self.inner.passes.load(Ordering::Relaxed)
    }

    /// Returns `true` while a pass is running.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.inner.in_flight.lock().is_some()
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }
}

impl<T> Clone for UpdateCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for UpdateCoordinator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateCoordinator")
            .field("name", &self.inner.name)
            .field("devices", &self.inner.devices.len())
            .field("observers", &self.inner.observers.len())
            .field("last_success", &self.last_success())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Inner<T> {
    async fn run_pass(&self) -> RefreshResult {
        let pass = self.passes.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(
            coordinator = %self.name,
            pass,
            devices = self.devices.len(),
            "Refresh started"
        );

        let updates: Vec<_> = self
            .devices
            .iter()
            .map(|device| device.update_state())
            .collect();
        let results = join_all(updates).await;

        let mut stale = Vec::new();
        for (device, result) in self.devices.iter().zip(results) {
            match result {
                Ok(()) => {}
                Err(e) if e.is_connect_timeout() => {
                    tracing::warn!(
                        device = %device.name(),
                        error = %e,
                        "Timeout while updating device state"
                    );
                    stale.push(device.id().clone());
                }
                Err(e) => {
                    self.last_pass_ok.store(false, Ordering::Release);
                    tracing::debug!(coordinator = %self.name, pass, "Refresh failed");
                    return Err(RefreshError::Device {
                        device: device.name(),
                        source: Arc::new(e),
                    });
                }
            }
        }

        let finished_at = Utc::now();
        *self.last_success.write() = Some(finished_at);
        self.last_pass_ok.store(true, Ordering::Release);
        self.observers.dispatch(&self.devices);

        tracing::debug!(
            coordinator = %self.name,
            pass,
            stale = stale.len(),
            "Refresh finished"
        );

        Ok(RefreshSummary {
            updated: self.devices.len() - stale.len(),
            stale,
            finished_at,
        })
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        if let Some(task) = self.periodic.get_mut().take() {
            task.cancel();
        }
    }
}

/// Empties the in-flight slot when the pass task ends, panics included.
struct InFlightSlot<'a, T>(&'a Inner<T>);

impl<T> Drop for InFlightSlot<'_, T> {
    fn drop(&mut self) {
        self.0.in_flight.lock().take();
    }
}
