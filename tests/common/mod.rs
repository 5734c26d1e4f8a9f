// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use themo_lib::error::{ApiError, Error};
use themo_lib::state::{DeviceDescriptor, DeviceState, StateUpdate};
use themo_lib::transport::Transport;
use themo_lib::types::DeviceId;
use themo_lib::{DeviceSet, Mode};

/// Failure injected into reads of one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The device cannot be reached before the connect timeout.
    ConnectTimeout,
    /// The service answers with a server error.
    Server,
}

/// Transport backed by a map of remote states.
#[derive(Default)]
pub struct FakeTransport {
    remote: Mutex<HashMap<DeviceId, DeviceState>>,
    failures: Mutex<HashMap<DeviceId, Failure>>,
    fetches: Mutex<HashMap<DeviceId, usize>>,
    writes: Mutex<Vec<(DeviceId, StateUpdate)>>,
    reject_writes: AtomicBool,
    fetch_delay: Mutex<Option<Duration>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_remote(&self, id: &str, state: DeviceState) {
        self.remote.lock().insert(DeviceId::new(id), state);
    }

    pub fn remote(&self, id: &str) -> Option<DeviceState> {
        self.remote.lock().get(&DeviceId::new(id)).cloned()
    }

    pub fn fail(&self, id: &str, failure: Failure) {
        self.failures.lock().insert(DeviceId::new(id), failure);
    }

    pub fn heal(&self, id: &str) {
        self.failures.lock().remove(&DeviceId::new(id));
    }

    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Delays every read by `delay` before answering.
    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock() = Some(delay);
    }

    pub fn fetch_count(&self, id: &str) -> usize {
        self.fetches
            .lock()
            .get(&DeviceId::new(id))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().values().sum()
    }

    pub fn writes(&self) -> Vec<(DeviceId, StateUpdate)> {
        self.writes.lock().clone()
    }
}

impl Transport for FakeTransport {
    async fn fetch_state(&self, id: &DeviceId) -> Result<DeviceState, Error> {
        *self.fetches.lock().entry(id.clone()).or_default() += 1;

        let delay = *self.fetch_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.lock().get(id).copied();
        match failure {
            Some(Failure::ConnectTimeout) => {
                Err(ApiError::ConnectTimeout(format!("device {id}")).into())
            }
            Some(Failure::Server) => Err(ApiError::Status {
                status: 500,
                reason: "Internal Server Error".to_string(),
            }
            .into()),
            None => {
                let state = self.remote.lock().get(id).cloned();
                state.ok_or_else(|| {
                    ApiError::Status {
                        status: 404,
                        reason: "Not Found".to_string(),
                    }
                    .into()
                })
            }
        }
    }

    async fn write_state(&self, id: &DeviceId, update: &StateUpdate) -> Result<(), Error> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                reason: "Internal Server Error".to_string(),
            }
            .into());
        }

        self.writes.lock().push((id.clone(), update.clone()));
        if let Some(state) = self.remote.lock().get_mut(id) {
            state.apply(update);
        }
        Ok(())
    }
}

pub fn descriptor(id: &str, state: DeviceState) -> DeviceDescriptor {
    DeviceDescriptor {
        id: DeviceId::new(id),
        state,
    }
}

/// Two devices, "Bathroom" (`1`) and "Kitchen" (`2`), whose remote state
/// differs from the state seen at enumeration.
pub fn two_devices() -> (Arc<FakeTransport>, Vec<DeviceDescriptor>) {
    let transport = Arc::new(FakeTransport::new());
    transport.set_remote(
        "1",
        DeviceState::named("Bathroom")
            .with_mode(Mode::Manual)
            .with_manual_temperature(24.0)
            .with_temperatures(22.0, 26.0, 21.0)
            .with_power(0.5, 2.0)
            .with_schedules(["Weekdays", "Weekend"], Some("Weekdays"))
            .with_sw_version("3.1.4"),
    );
    transport.set_remote(
        "2",
        DeviceState::named("Kitchen")
            .with_mode(Mode::Scheduled)
            .with_temperatures(19.0, 20.0, 18.5)
            .with_lights(true),
    );

    let descriptors = vec![
        descriptor("1", DeviceState::named("Bathroom")),
        descriptor("2", DeviceState::named("Kitchen")),
    ];
    (transport, descriptors)
}

pub fn device_set(
    transport: &Arc<FakeTransport>,
    descriptors: Vec<DeviceDescriptor>,
) -> DeviceSet<FakeTransport> {
    DeviceSet::from_descriptors(descriptors, transport)
}

// ============================================================================
// Log capture
// ============================================================================

/// One recorded tracing event.
#[derive(Debug, Clone)]
pub struct LoggedEvent {
    pub level: Level,
    pub fields: HashMap<String, String>,
}

impl LoggedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Records every event emitted on the current thread while its guard lives.
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<LoggedEvent>>>,
}

impl LogCapture {
    /// Installs the capture as the thread's default subscriber.
    ///
    /// Only sees events from tasks polled on this thread, so use it with the
    /// current-thread test runtime.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn at_level(&self, level: Level) -> Vec<LoggedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.level == level)
            .cloned()
            .collect()
    }
}

struct FieldRecorder(HashMap<String, String>);

impl Visit for FieldRecorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder(HashMap::new());
        event.record(&mut recorder);
        self.events.lock().push(LoggedEvent {
            level: *event.metadata().level(),
            fields: recorder.0,
        });
    }
}
