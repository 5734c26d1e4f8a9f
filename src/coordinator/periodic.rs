// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background task driving periodic refreshes.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::{Inner, UpdateCoordinator};
use crate::transport::Transport;

/// Handle to a running periodic task.
pub(super) struct PeriodicTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    pub(super) fn new(cancel: CancellationToken, handle: JoinHandle<()>) -> Self {
        Self { cancel, handle }
    }

    /// Signals the task to exit without waiting for it.
    pub(super) fn cancel(&self) {
        self.cancel.cancel();
    }

    pub(super) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Signals the task to exit and waits until it has.
    pub(super) async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "Periodic refresh task ended abnormally");
        }
    }
}

/// Refreshes the coordinator every `period` until cancelled or until the
/// coordinator is dropped.
pub(super) async fn refresh_task<T: Transport>(
    inner: Weak<Inner<T>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let Some(inner) = inner.upgrade() else { break };
                let coordinator = UpdateCoordinator { inner };

                if let Err(e) = coordinator.refresh_now().await {
                    tracing::warn!(
                        coordinator = %coordinator.name(),
                        error = %e,
                        "Periodic refresh failed"
                    );
                }
            }
        }
    }

    tracing::debug!("Periodic refresh task exited");
}
