// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration configuration.

use std::fmt;
use std::time::Duration;

use serde::de::{Deserializer, Error as _, Unexpected};
use serde::Deserialize;

#[cfg(feature = "http")]
use crate::transport::ClientConfig;
use crate::transport::DEFAULT_BASE_URL;

/// Credentials and tuning for one integration instance.
///
/// Can be built in code or deserialized from a host config entry:
///
/// ```
/// use std::time::Duration;
/// use themo_lib::setup::IntegrationConfig;
///
/// let config: IntegrationConfig = serde_json::from_str(r#"{
///     "username": "user@example.com",
///     "password": "secret",
///     "scan_interval_secs": 60
/// }"#).unwrap();
///
/// assert_eq!(config.scan_interval(), Duration::from_secs(60));
/// assert_eq!(config.timeout(), IntegrationConfig::DEFAULT_TIMEOUT);
/// ```
///
/// Intervals are given in whole seconds and must be positive.
#[derive(Clone, Deserialize)]
pub struct IntegrationConfig {
    username: String,
    password: String,
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(
        rename = "scan_interval_secs",
        default = "default_scan_interval",
        deserialize_with = "positive_secs"
    )]
    scan_interval: Duration,
    #[serde(
        rename = "timeout_secs",
        default = "default_timeout",
        deserialize_with = "positive_secs"
    )]
    timeout: Duration,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_scan_interval() -> Duration {
    IntegrationConfig::DEFAULT_SCAN_INTERVAL
}

fn default_timeout() -> Duration {
    IntegrationConfig::DEFAULT_TIMEOUT
}

fn positive_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    match u64::deserialize(deserializer)? {
        0 => Err(D::Error::invalid_value(
            Unexpected::Unsigned(0),
            &"a positive number of seconds",
        )),
        secs => Ok(Duration::from_secs(secs)),
    }
}

impl IntegrationConfig {
    /// Default interval between periodic refreshes.
    pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(120);
    /// Shortest accepted refresh interval.
    pub const MIN_SCAN_INTERVAL: Duration = Duration::from_secs(1);
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration with default tuning.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            base_url: default_base_url(),
            scan_interval: Self::DEFAULT_SCAN_INTERVAL,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the service address.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the refresh interval.
    ///
    /// Values below [`Self::MIN_SCAN_INTERVAL`] are raised to it.
    #[must_use]
    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval.max(Self::MIN_SCAN_INTERVAL);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Account user name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Account password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Service address.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Interval between periodic refreshes.
    #[must_use]
    pub fn scan_interval(&self) -> Duration {
        self.scan_interval
    }

    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// HTTP client configuration derived from this configuration.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_base_url(self.base_url.as_str())
            .with_timeout(self.timeout())
    }
}

impl fmt::Debug for IntegrationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("scan_interval", &self.scan_interval)
            .field("timeout", &self.timeout)
            .finish()
    }
}
