//! Error types for catalog-dl
//!
//! This module provides the error taxonomy shared by the gateway, the fetch
//! orchestrator and the collection coordinator:
//! - Transport failures (unreachable host, non-2xx status, truncated body)
//! - Decode failures (payload does not match the expected shape)
//! - Contract violations (index-addressed mutation outside the collection)
//! - Configuration errors with the offending key
//!
//! "No data" and "undecodable image" are not errors. They are modeled as
//! `Ok(None)` by the operations that can produce them.

use thiserror::Error;

/// Result type alias for catalog-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for catalog-dl
///
/// Errors raised by the remote gateway surface unchanged through the
/// orchestrator and the coordinator. Transport and decode errors are only
/// distinguished for observability; neither is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be completed (connect failure, non-2xx status, body read failure)
    #[error("transport error fetching {url}: {message}")]
    Transport {
        /// The URL that was being fetched
        url: String,
        /// Description of the underlying failure
        message: String,
    },

    /// The response body did not match the expected payload shape
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// The URL whose response could not be decoded
        url: String,
        /// Description of the decoding failure
        message: String,
    },

    /// An index-addressed mutation was issued against a position outside the collection
    #[error("precondition violated: index {index} is out of bounds for collection of {len} items")]
    PreconditionViolated {
        /// The index that was requested
        index: usize,
        /// The collection length at the time of the call
        len: usize,
    },

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "endpoints.collection_url")
        key: Option<String>,
    },

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a transport error for `url` from any displayable cause
    pub fn transport(url: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Error::Transport {
            url: url.into(),
            message: cause.to_string(),
        }
    }

    /// Build a decode error for `url` from any displayable cause
    pub fn decode(url: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Error::Decode {
            url: url.into(),
            message: cause.to_string(),
        }
    }

    /// Whether this error came from the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// Whether this error came from payload decoding
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. })
    }

    /// Machine-readable error code, stable across releases
    ///
    /// Intended for log fields and metrics labels.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Transport { .. } => "transport_error",
            Error::Decode { .. } => "decode_error",
            Error::PreconditionViolated { .. } => "precondition_violated",
            Error::Config { .. } => "config_error",
            Error::Other(_) => "internal_error",
        }
    }
}
