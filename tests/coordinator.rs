// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the update coordinator.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::{Failure, FakeTransport, LogCapture, device_set, two_devices};
use themo_lib::error::RefreshError;
use themo_lib::types::{DeviceId, HvacMode};
use themo_lib::{DeviceSet, UpdateCoordinator};

fn coordinator() -> (Arc<FakeTransport>, UpdateCoordinator<FakeTransport>) {
    let (transport, descriptors) = two_devices();
    let devices = device_set(&transport, descriptors);
    (transport, UpdateCoordinator::new("test_update", devices))
}

fn counting_observer(
    coordinator: &UpdateCoordinator<FakeTransport>,
) -> (
    Arc<AtomicUsize>,
    themo_lib::Subscription<DeviceSet<FakeTransport>>,
) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let subscription = coordinator.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (calls, subscription)
}

// ============================================================================
// Refresh passes
// ============================================================================

mod refresh {
    use super::*;

    #[tokio::test]
    async fn first_refresh_updates_every_device_once() {
        let (transport, coordinator) = coordinator();

        let summary = coordinator.refresh_now().await.unwrap();

        assert_eq!(transport.fetch_count("1"), 1);
        assert_eq!(transport.fetch_count("2"), 1);
        assert_eq!(summary.updated(), 2);
        assert!(summary.is_complete());

        let bathroom = coordinator.devices().get(&DeviceId::new("1")).unwrap();
        assert_eq!(bathroom.hvac_mode(), HvacMode::Heat);
        assert_eq!(bathroom.measured_temperature(), Some(22.0));
        let kitchen = coordinator.devices().get(&DeviceId::new("2")).unwrap();
        assert_eq!(kitchen.hvac_mode(), HvacMode::Auto);
        assert!(kitchen.lights());

        assert_eq!(coordinator.last_success(), Some(summary.finished_at()));
    }

    #[tokio::test]
    async fn connect_timeout_keeps_device_stale_and_pass_succeeds() {
        let (transport, coordinator) = coordinator();
        transport.fail("1", Failure::ConnectTimeout);
        let before = coordinator.devices().get(&DeviceId::new("1")).unwrap().state();

        let summary = coordinator.refresh_now().await.unwrap();

        assert_eq!(summary.updated(), 1);
        assert_eq!(summary.stale(), &[DeviceId::new("1")]);

        let bathroom = coordinator.devices().get(&DeviceId::new("1")).unwrap();
        assert_eq!(bathroom.state(), before);
        let kitchen = coordinator.devices().get(&DeviceId::new("2")).unwrap();
        assert_eq!(kitchen.measured_temperature(), Some(19.0));

        assert!(coordinator.last_success().is_some());
        assert!(coordinator.last_update_success());
    }

    #[tokio::test]
    async fn connect_timeout_logs_one_warning_naming_the_device() {
        let (capture, _guard) = LogCapture::install();
        let (transport, coordinator) = coordinator();
        transport.fail("1", Failure::ConnectTimeout);

        coordinator.refresh_now().await.unwrap();

        let warnings = capture.at_level(tracing::Level::WARN);
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert_eq!(warnings[0].field("device"), Some("Bathroom"));
        assert_eq!(
            warnings[0].field("message"),
            Some("Timeout while updating device state")
        );
    }

    #[tokio::test]
    async fn other_error_fails_the_pass() {
        let (transport, coordinator) = coordinator();
        let (calls, _subscription) = counting_observer(&coordinator);
        transport.fail("2", Failure::Server);

        let err = coordinator.refresh_now().await.unwrap_err();

        match err {
            RefreshError::Device { device, source } => {
                assert_eq!(device, "Kitchen");
                assert!(!source.is_connect_timeout());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(coordinator.last_success().is_none());
        assert!(!coordinator.last_update_success());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failing_device_does_not_cancel_siblings() {
        let (transport, coordinator) = coordinator();
        transport.fail("1", Failure::Server);

        coordinator.refresh_now().await.unwrap_err();

        assert_eq!(transport.fetch_count("2"), 1);
        let kitchen = coordinator.devices().get(&DeviceId::new("2")).unwrap();
        assert!(kitchen.lights());
    }

    #[tokio::test]
    async fn failed_pass_does_not_move_last_success() {
        let (transport, coordinator) = coordinator();
        let first = coordinator.refresh_now().await.unwrap();

        transport.fail("1", Failure::Server);
        coordinator.refresh_now().await.unwrap_err();

        assert_eq!(coordinator.last_success(), Some(first.finished_at()));
        assert!(!coordinator.last_update_success());

        transport.heal("1");
        coordinator.refresh_now().await.unwrap();
        assert!(coordinator.last_update_success());
    }

    #[tokio::test]
    async fn sequential_requests_run_separate_passes() {
        let (transport, coordinator) = coordinator();

        coordinator.refresh_now().await.unwrap();
        coordinator.refresh_now().await.unwrap();

        assert_eq!(transport.fetch_count("1"), 2);
        assert_eq!(coordinator.pass_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_requests_share_one_pass() {
        let (transport, coordinator) = coordinator();
        let (calls, _subscription) = counting_observer(&coordinator);
        transport.set_fetch_delay(Duration::from_secs(1));

        let (a, b, c) = tokio::join!(
            coordinator.refresh_now(),
            coordinator.refresh_now(),
            coordinator.refresh_now()
        );

        let a = a.unwrap();
        assert_eq!(a, b.unwrap());
        assert_eq!(a, c.unwrap());
        assert_eq!(transport.fetch_count("1"), 1);
        assert_eq!(transport.fetch_count("2"), 1);
        assert_eq!(coordinator.pass_count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_requests_share_one_failure() {
        let (transport, coordinator) = coordinator();
        transport.set_fetch_delay(Duration::from_secs(1));
        transport.fail("1", Failure::Server);

        let (a, b) = tokio::join!(coordinator.refresh_now(), coordinator.refresh_now());

        assert!(matches!(a, Err(RefreshError::Device { .. })));
        assert!(matches!(b, Err(RefreshError::Device { .. })));
        assert_eq!(transport.fetch_count("1"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_request_still_completes_the_pass() {
        let (transport, coordinator) = coordinator();
        let (calls, _subscription) = counting_observer(&coordinator);
        transport.set_fetch_delay(Duration::from_secs(5));

        let abandoned =
            tokio::time::timeout(Duration::from_secs(1), coordinator.refresh_now()).await;
        assert!(abandoned.is_err());
        assert!(coordinator.is_refreshing());

        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(coordinator.last_success().is_some());
        assert!(!coordinator.is_refreshing());
    }
}

// ============================================================================
// Observers
// ============================================================================

mod observers {
    use super::*;

    #[tokio::test]
    async fn observer_is_called_once_per_pass_with_every_device() {
        let (_transport, coordinator) = coordinator();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let _subscription = coordinator.subscribe(move |devices| {
            sink.lock().push(devices.len());
        });

        coordinator.refresh_now().await.unwrap();

        assert_eq!(*seen.lock(), vec![2]);
    }

    #[tokio::test]
    async fn observer_sees_refreshed_state() {
        let (_transport, coordinator) = coordinator();
        let temperatures = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let sink = Arc::clone(&temperatures);
        let _subscription = coordinator.subscribe(move |devices| {
            let mut sink = sink.lock();
            for device in devices {
                sink.push(device.room_temperature());
            }
        });

        coordinator.refresh_now().await.unwrap();

        assert_eq!(*temperatures.lock(), vec![Some(21.0), Some(18.5)]);
    }

    #[tokio::test]
    async fn subscribing_does_not_replay() {
        let (_transport, coordinator) = coordinator();
        coordinator.refresh_now().await.unwrap();

        let (calls, _subscription) = counting_observer(&coordinator);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dropped_subscription_is_not_called() {
        let (_transport, coordinator) = coordinator();
        let (calls, subscription) = counting_observer(&coordinator);

        coordinator.refresh_now().await.unwrap();
        drop(subscription);
        coordinator.refresh_now().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.observer_count(), 0);
    }

    #[tokio::test]
    async fn timed_out_device_still_notifies() {
        let (transport, coordinator) = coordinator();
        let (calls, _subscription) = counting_observer(&coordinator);
        transport.fail("1", Failure::ConnectTimeout);
        transport.fail("2", Failure::ConnectTimeout);

        coordinator.refresh_now().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

// ============================================================================
// Periodic refresh
// ============================================================================

mod periodic {
    use super::*;

    const INTERVAL: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn refreshes_every_interval() {
        let (transport, coordinator) = coordinator();

        coordinator.start_periodic(INTERVAL);
        assert!(coordinator.is_periodic_running());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(transport.fetch_count("1"), 0);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(transport.fetch_count("1"), 1);

        tokio::time::sleep(INTERVAL).await;
        assert_eq!(transport.fetch_count("1"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_further_refreshes() {
        let (transport, coordinator) = coordinator();
        coordinator.start_periodic(INTERVAL);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(transport.fetch_count("1"), 1);

        assert!(coordinator.stop_periodic().await);
        assert!(!coordinator.is_periodic_running());
        assert!(!coordinator.stop_periodic().await);

        tokio::time::sleep(INTERVAL * 5).await;
        assert_eq!(transport.fetch_count("1"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelling_mid_pass_lets_the_pass_finish() {
        let (transport, coordinator) = coordinator();
        let (calls, _subscription) = counting_observer(&coordinator);
        transport.set_fetch_delay(Duration::from_secs(10));
        coordinator.start_periodic(INTERVAL);

        // The first automatic pass starts at 60s and finishes at 70s.
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(coordinator.is_refreshing());
        assert!(coordinator.cancel_periodic());

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(coordinator.last_success().is_some());

        tokio::time::sleep(INTERVAL * 5).await;
        assert_eq!(transport.fetch_count("1"), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_periodic_pass_keeps_schedule() {
        let (transport, coordinator) = coordinator();
        transport.fail("1", Failure::Server);
        coordinator.start_periodic(INTERVAL);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(!coordinator.last_update_success());

        transport.heal("1");
        tokio::time::sleep(INTERVAL).await;
        assert!(coordinator.last_update_success());
        assert_eq!(transport.fetch_count("1"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_replaces_the_schedule() {
        let (transport, coordinator) = coordinator();
        coordinator.start_periodic(INTERVAL);
        coordinator.start_periodic(Duration::from_secs(100));

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(transport.fetch_count("1"), 0);

        tokio::time::sleep(Duration::from_secs(40)).await;
        assert_eq!(transport.fetch_count("1"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_coordinator_stops_the_schedule() {
        let (transport, coordinator) = coordinator();
        coordinator.start_periodic(INTERVAL);
        drop(coordinator);

        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(transport.total_fetches(), 0);
    }
}
