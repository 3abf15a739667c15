//! Error types for The One API client.
//!
//! # Design
//! Every failure surfaces synchronously to the caller of a facade method;
//! the client performs no local recovery. Variants split caller bugs
//! (`Validation`, `Configuration`) from server-side outcomes (`Http`,
//! `NotFound`) and from payload problems (`Parse`, `Schema`) so callers can
//! branch on them without string matching.

use thiserror::Error;

/// Errors returned by the client, the query compiler and the response
/// validator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Missing or blank credential; raised when the client is constructed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed filter, sort, pagination or id input. Raised before any
    /// request is issued.
    #[error("invalid request parameters: {0}")]
    Validation(String),

    /// The server answered with a status other than 200.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body is not valid JSON.
    #[error("response is not valid JSON: {0}")]
    Parse(String),

    /// The JSON does not match the expected resource shape.
    #[error("unexpected response shape: {0}")]
    Schema(String),

    /// A by-id lookup returned no documents.
    #[error("{0} not found")]
    NotFound(String),

    /// The request never produced a response (DNS, connect, timeout).
    #[error("transport failed: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;
