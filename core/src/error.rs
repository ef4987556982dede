//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." The service itself answers unknown ids with `200 null`, which
//! parsers surface as `Ok(None)` rather than an error. All other non-2xx
//! responses land in `HttpError` with the raw status code and body.

use thiserror::Error;

/// Errors returned by `TodoClient` parse methods and by transports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 404: the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never completed (connection refused, reset, DNS).
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// True for 5xx responses.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::HttpError { status, .. } if *status >= 500)
    }
}
