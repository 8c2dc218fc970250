//! Error types for the data-pool client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently tell "the
//! pool does not exist" apart from other failures. Every other non-2xx
//! response lands in `HttpError` with the raw status and body. Nothing here
//! is retried or swallowed; every variant reaches the caller.

use thiserror::Error;

/// Errors returned by `DataPoolClient` and `DataPoolService`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// An id-bound operation was called with an empty id.
    #[error("operation requires a non-empty id")]
    MissingId,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("csv decoding failed: {0}")]
    Csv(String),
}

impl From<csv::Error> for ApiError {
    fn from(e: csv::Error) -> Self {
        ApiError::Csv(e.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::InvalidUrl(e.to_string())
    }
}
