//! Error types for the content API client and the submission pipeline.
//!
//! # Design
//! `ApiError` covers everything that can go wrong talking to the content
//! backend, including a missing base URL, which is reported when the client
//! is constructed rather than when a request is sent. `DecodeError` is the
//! transport-level failure of turning a request body into a `RawInput`; it
//! is deliberately separate from `FieldErrors`. `ForwardError` wraps an
//! `ApiError` with the operation that was in flight.

use std::fmt;

use thiserror::Error;

/// Errors returned by `ContentClient` and by `Transport` implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The content API base URL is missing or unusable.
    #[error("{0}")]
    Configuration(String),

    /// A record path was empty.
    #[error("Path is not defined.")]
    MissingPath,

    /// The server answered with a non-2xx status.
    #[error("request failed. Status: {status} {status_text}")]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Failure to decode a request body into a `RawInput`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("malformed request body: {0}")]
    Malformed(String),

    #[error("part `{field}` exceeds the {limit} byte limit")]
    PartTooLarge { field: String, limit: usize },
}

/// The external call that was running when forwarding failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Uploading the file held by the named field.
    Upload { field: String },
    /// Creating the record at the given path.
    CreateRecord { path: String },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Upload { field } => write!(f, "uploading {field}"),
            Operation::CreateRecord { .. } => write!(f, "creating record"),
        }
    }
}

/// An `ApiError` tagged with the operation it interrupted.
///
/// Displays as `Error uploading image: request failed. Status: 500 ...`.
#[derive(Debug, Error)]
#[error("Error {operation}: {source}")]
pub struct ForwardError {
    pub operation: Operation,
    #[source]
    pub source: ApiError,
}

impl ForwardError {
    pub fn new(operation: Operation, source: ApiError) -> Self {
        Self { operation, source }
    }
}
