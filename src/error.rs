//! Error types for wavefetch
//!
//! This module provides the error taxonomy for the library:
//! - Caller errors (invalid arguments, unsupported request methods)
//! - Transport-level failures (timeouts, connection errors, DNS)
//! - Terminal retry exhaustion
//! - Configuration errors (proxy list inconsistencies)
//!
//! A non-200 HTTP status is *not* an error anywhere in this crate; it is
//! reported as a normal [`crate::types::Response`] with no content.

use thiserror::Error;

/// Result type alias for wavefetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wavefetch
///
/// Transient transport failures are contained and retried inside the retry
/// driver; every other variant propagates unchanged to the caller of the
/// operation that raised it.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed caller input (e.g. a wave step of zero)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Request method outside the supported set (get/post/put/patch/options)
    #[error("unsupported request method: {0:?}")]
    UnsupportedMethod(String),

    /// Transport-level failure (timeout, connection error, DNS)
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Retry budget consumed without a successful attempt
    #[error("maximum connection retries exceeded after {attempts} attempts")]
    RetriesExhausted {
        /// Total number of attempts made before giving up
        attempts: u32,
    },

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "proxy_file")
        key: Option<String>,
    },

    /// Response body was requested as JSON but could not be decoded
    #[error("body decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// I/O error (proxy list file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for an [`Error::Config`] with a message and optional key
    pub fn config(message: impl Into<String>, key: Option<&str>) -> Self {
        Error::Config {
            message: message.into(),
            key: key.map(str::to_string),
        }
    }
}

/// Transport-level failure raised by a [`crate::transport::Transport`]
///
/// These are the conditions the retry driver treats as transient. A proxy
/// dispatch failure is the exception: it indicates an inconsistent client
/// setup, not a flaky network, and is never retried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection or request timeout
    #[error("connection timeout: {0}")]
    Timeout(String),

    /// TCP connect, TLS, or DNS resolution failure
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other request-level failure (protocol error, redirect loop, ...)
    #[error("request failed: {0}")]
    Request(String),

    /// The response arrived but its body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),

    /// No transport client exists for the requested proxy endpoint
    #[error("no transport client for proxy: {0}")]
    Proxy(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            TransportError::Body(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}
