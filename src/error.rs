// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `Themo` library.
//!
//! This module provides the error hierarchy used across the library: value
//! validation, remote API communication, payload parsing, refresh passes and
//! integration setup.

use std::sync::Arc;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the remote API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A refresh pass failed.
    #[error("refresh error: {0}")]
    Refresh(#[from] RefreshError),
}

impl Error {
    /// Returns `true` if this error means the device could not be reached
    /// before the connect timeout expired.
    ///
    /// This is the only error class a refresh pass absorbs per device; every
    /// other error fails the whole pass.
    #[must_use]
    pub fn is_connect_timeout(&self) -> bool {
        match self {
            Self::Api(api) => api.is_connect_timeout(),
            _ => false,
        }
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A temperature is not a finite number.
    #[error("temperature is not a finite number")]
    NonFiniteTemperature,

    /// The requested HVAC mode has no remote counterpart.
    #[error("unsupported HVAC mode: {0}")]
    UnsupportedHvacMode(String),

    /// The requested schedule is not offered by the device.
    #[error("unknown schedule: {0}")]
    UnknownSchedule(String),
}

/// Errors related to remote API communication.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The connection could not be established in time.
    #[error("connect timeout: {0}")]
    ConnectTimeout(String),

    /// Connection to the service failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The service answered with a non-success status.
    #[error("unexpected status {status}: {reason}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Credentials were rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// A request was made before authenticating.
    #[error("client is not authenticated")]
    NotAuthenticated,
}

impl ApiError {
    /// Returns `true` for connect timeouts.
    #[must_use]
    pub fn is_connect_timeout(&self) -> bool {
        match self {
            #[cfg(feature = "http")]
            Self::Http(e) => e.is_connect() && e.is_timeout(),
            Self::ConnectTimeout(_) => true,
            _ => false,
        }
    }
}

/// Errors related to parsing API payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),
}

/// Outcome of a failed refresh pass.
///
/// Cloneable so that every caller coalesced onto the same pass receives the
/// same error.
#[derive(Debug, Error, Clone)]
pub enum RefreshError {
    /// A device update failed with an error that is not a connect timeout.
    #[error("updating {device} failed: {source}")]
    Device {
        /// Display name of the device whose update failed.
        device: String,
        /// The underlying error.
        #[source]
        source: Arc<Error>,
    },

    /// The refresh task ended without producing a result.
    #[error("refresh task aborted: {0}")]
    Aborted(String),
}

/// Failure while validating credentials or setting up an integration.
///
/// Carries the underlying error together with the category a host form
/// reports back to the user.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The service rejected the credentials.
    #[error("invalid credentials: {0}")]
    InvalidAuth(#[source] Error),

    /// The service could not be reached.
    #[error("cannot connect: {0}")]
    CannotConnect(#[source] Error),

    /// Any other failure.
    #[error("unexpected setup failure: {0}")]
    Unknown(#[source] Error),
}

/// Category of a [`SetupError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupErrorKind {
    /// Credentials were rejected.
    InvalidAuth,
    /// The service was unreachable.
    CannotConnect,
    /// Anything else.
    Unknown,
}

impl SetupErrorKind {
    /// Returns the error key shown by host forms.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidAuth => "invalid_auth",
            Self::CannotConnect => "cannot_connect",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SetupErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SetupError {
    /// Returns the category of this failure.
    #[must_use]
    pub fn kind(&self) -> SetupErrorKind {
        match self {
            Self::InvalidAuth(_) => SetupErrorKind::InvalidAuth,
            Self::CannotConnect(_) => SetupErrorKind::CannotConnect,
            Self::Unknown(_) => SetupErrorKind::Unknown,
        }
    }

    /// Returns the underlying error.
    #[must_use]
    pub fn inner(&self) -> &Error {
        match self {
            Self::InvalidAuth(e) | Self::CannotConnect(e) | Self::Unknown(e) => e,
        }
    }
}

impl From<Error> for SetupError {
    fn from(error: Error) -> Self {
        match &error {
            Error::Api(ApiError::AuthenticationFailed | ApiError::NotAuthenticated) => {
                Self::InvalidAuth(error)
            }
            Error::Api(
                ApiError::ConnectTimeout(_)
                | ApiError::ConnectionFailed(_)
                | ApiError::InvalidAddress(_),
            ) => Self::CannotConnect(error),
            #[cfg(feature = "http")]
            Error::Api(ApiError::Http(e)) if e.is_connect() || e.is_timeout() => {
                Self::CannotConnect(error)
            }
            _ => Self::Unknown(error),
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
