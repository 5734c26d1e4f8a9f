// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the Themo cloud API.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::error::{ApiError, Error, ParseError};
use crate::state::{DeviceDescriptor, DeviceState, StateUpdate};
use crate::transport::Transport;
use crate::types::DeviceId;

// ============================================================================
// ClientConfig
// ============================================================================

/// Configuration for a [`ThemoClient`].
///
/// # Examples
///
/// ```
/// use themo_lib::transport::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_base_url("http://127.0.0.1:8080")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "http://127.0.0.1:8080");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    connect_timeout: Duration,
}

impl ClientConfig {
    /// Default service address.
    pub const DEFAULT_BASE_URL: &'static str = super::DEFAULT_BASE_URL;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default connect timeout.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a configuration pointing at the public service.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Sets the service address. A trailing slash is ignored.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the overall request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Returns the service address.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Creates a [`ThemoClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not an HTTP(S) URL or the HTTP client
    /// cannot be created.
    pub fn into_client(self) -> Result<ThemoClient, ApiError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidAddress(self.base_url));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(ApiError::Http)?;

        Ok(ThemoClient {
            base_url: self.base_url,
            client,
            token: Arc::new(RwLock::new(None)),
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ThemoClient
// ============================================================================

/// Authenticated client for the Themo cloud API.
///
/// Clones share the same access token, so a client can be authenticated once
/// and handed to every device proxy.
///
/// # Examples
///
/// ```no_run
/// use themo_lib::transport::ClientConfig;
///
/// # async fn example() -> themo_lib::Result<()> {
/// let client = ClientConfig::new().into_client()?;
/// client.authenticate("user@example.com", "secret").await?;
///
/// for descriptor in client.get_all_devices().await? {
///     println!("{} - {}", descriptor.id, descriptor.state.name());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ThemoClient {
    base_url: String,
    client: Client,
    token: Arc<RwLock<Option<String>>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

impl ThemoClient {
    /// Creates an unauthenticated client for the public service.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, ApiError> {
        ClientConfig::new().into_client()
    }

    /// Returns the service address.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns `true` once [`authenticate`](Self::authenticate) succeeded.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// Exchanges credentials for an access token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationFailed` if the credentials are
    /// rejected, or a transport error if the service cannot be reached.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<(), Error> {
        let url = format!("{}/token", self.base_url);

        tracing::debug!(url = %url, username = %username, "Authenticating");

        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ])
            .send()
            .await
            .map_err(classify_send_error)?;

        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED
        ) {
            return Err(ApiError::AuthenticationFailed.into());
        }

        let token: TokenResponse = parse_body(check_status(response)?).await?;
        let token = token
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ParseError::MissingField("access_token".to_string()))?;
        *self.token.write() = Some(token);

        tracing::debug!("Authenticated");
        Ok(())
    }

    /// Lists every device registered to the account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotAuthenticated` before authentication, or an error
    /// if the request fails or the response cannot be parsed.
    pub async fn get_all_devices(&self) -> Result<Vec<DeviceDescriptor>, Error> {
        let url = format!("{}/api/devices", self.base_url);
        let response = self.get(&url).await?;
        let devices: Vec<DeviceDescriptor> = parse_body(response).await?;

        tracing::debug!(count = devices.len(), "Enumerated devices");
        Ok(devices)
    }

    fn device_url(&self, id: &DeviceId) -> String {
        format!(
            "{}/api/devices/{}",
            self.base_url,
            urlencoding::encode(id.as_str())
        )
    }

    fn bearer(&self) -> Result<String, ApiError> {
        self.token
            .read()
            .as_ref()
            .map(|token| format!("Bearer {token}"))
            .ok_or(ApiError::NotAuthenticated)
    }

    async fn get(&self, url: &str) -> Result<Response, Error> {
        let bearer = self.bearer()?;

        tracing::debug!(url = %url, "Sending GET");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, bearer)
            .send()
            .await
            .map_err(classify_send_error)?;

        Ok(check_status(response)?)
    }
}

impl Transport for ThemoClient {
    async fn fetch_state(&self, id: &DeviceId) -> Result<DeviceState, Error> {
        let response = self.get(&self.device_url(id)).await?;
        parse_body(response).await
    }

    async fn write_state(&self, id: &DeviceId, update: &StateUpdate) -> Result<(), Error> {
        let bearer = self.bearer()?;
        let url = format!("{}/state", self.device_url(id));

        tracing::debug!(url = %url, update = ?update, "Sending PUT");

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::AUTHORIZATION, bearer)
            .json(update)
            .send()
            .await
            .map_err(classify_send_error)?;

        check_status(response)?;
        Ok(())
    }
}

/// Maps a send failure onto the error classes the rest of the library cares
/// about: connect timeouts and refused connections are kept distinct from
/// other transport errors.
fn classify_send_error(e: reqwest::Error) -> ApiError {
    if e.is_connect() && e.is_timeout() {
        ApiError::ConnectTimeout(e.to_string())
    } else if e.is_connect() {
        ApiError::ConnectionFailed(e.to_string())
    } else {
        ApiError::Http(e)
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::AuthenticationFailed);
    }

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    Ok(response)
}

async fn parse_body<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, Error> {
    let body = response.text().await.map_err(ApiError::Http)?;

    tracing::debug!(body = %body, "Received response");

    serde_json::from_str(&body).map_err(|e| ParseError::Json(e).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = ClientConfig::new();
        assert_eq!(config.base_url(), "https://app.themo.io");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn config_trims_trailing_slash() {
        let config = ClientConfig::new().with_base_url("http://localhost:9000/");
        assert_eq!(config.base_url(), "http://localhost:9000");
    }

    #[test]
    fn config_rejects_non_http_address() {
        let result = ClientConfig::new().with_base_url("ftp://example").into_client();
        assert!(matches!(result, Err(ApiError::InvalidAddress(_))));
    }

    #[test]
    fn new_client_is_not_authenticated() {
        let client = ThemoClient::new().unwrap();
        assert!(!client.is_authenticated());
        assert!(matches!(client.bearer(), Err(ApiError::NotAuthenticated)));
    }

    #[test]
    fn device_url_encodes_id() {
        let client = ClientConfig::new()
            .with_base_url("http://localhost")
            .into_client()
            .unwrap();
        assert_eq!(
            client.device_url(&DeviceId::new("a b")),
            "http://localhost/api/devices/a%20b"
        );
    }

    #[test]
    fn clones_share_token() {
        let client = ThemoClient::new().unwrap();
        let clone = client.clone();
        *client.token.write() = Some("abc".to_string());
        assert!(clone.is_authenticated());
        assert_eq!(clone.bearer().unwrap(), "Bearer abc");
    }
}
