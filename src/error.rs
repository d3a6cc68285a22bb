//! Error types for the Kodi remote client.
//!
//! Two layers of errors exist:
//!
//! - [`TransportError`] - raw failures of the JSON-RPC transport (HTTP status,
//!   socket errors, remote JSON-RPC errors, timeouts). These are opaque to the
//!   connection layer and are propagated unmodified by most operations.
//! - [`enum@Error`] - the domain error surfaced to callers. Only two transport
//!   failures are reclassified: a failed handshake or unreachable device
//!   becomes [`Error::CannotConnect`], and a rejected credential check during
//!   `ping` becomes [`Error::InvalidAuth`].
//!
//! # Usage
//!
//! ```ignore
//! use kodi_remote::{Client, Error};
//!
//! match client.ping().await {
//!     Ok(true) => println!("alive"),
//!     Ok(false) => println!("unexpected reply"),
//!     Err(Error::InvalidAuth { .. }) => println!("check username/password"),
//!     Err(Error::CannotConnect { .. }) => println!("device unreachable"),
//!     Err(other) => println!("{other}"),
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Domain | [`Error::CannotConnect`], [`Error::InvalidAuth`] |
//! | Usage | [`Error::Config`], [`Error::Unsupported`] |
//! | Opaque | [`Error::Transport`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use reqwest::StatusCode;
use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Aliases
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

/// Result type alias for transport-level operations.
pub type TransportResult<T> = StdResult<T, TransportError>;

// ============================================================================
// Domain Error
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The device could not be reached or the transport handshake failed.
    #[error("Cannot connect to Kodi: {source}")]
    CannotConnect {
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// The device rejected the configured credentials.
    #[error("Invalid authentication: {source}")]
    InvalidAuth {
        /// Underlying transport failure carrying the rejection.
        #[source]
        source: TransportError,
    },

    /// Configuration error.
    ///
    /// Returned by [`ConnectionConfigBuilder::build`](crate::ConnectionConfigBuilder::build).
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Operation not available on this transport variant.
    #[error("Unsupported operation for this connection: {operation}")]
    Unsupported {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// Any other transport failure, propagated unmodified.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

// ============================================================================
// Transport Error
// ============================================================================

/// Failure reported by a [`Transport`](crate::transport::Transport).
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP endpoint answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code returned by the device.
        status: StatusCode,
        /// Response body, for diagnostics.
        body: String,
    },

    /// HTTP request could not be performed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// WebSocket error (handshake or I/O).
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote end returned a JSON-RPC error object.
    #[error("JSON-RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// JSON-RPC error message.
        message: String,
    },

    /// No response within the configured timeout.
    #[error("{method} timed out after {timeout_ms}ms")]
    Timeout {
        /// Method (or `"handshake"`) that timed out.
        method: String,
        /// Milliseconds waited.
        timeout_ms: u64,
    },

    /// Duplex transport used before a successful handshake.
    #[error("Not connected")]
    NotConnected,

    /// Duplex link dropped while a request was in flight.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Too many requests awaiting a response on the duplex link.
    #[error("Too many pending requests: {pending}/{max}")]
    TooManyPending {
        /// Requests currently awaiting a response.
        pending: usize,
        /// Configured limit.
        max: usize,
    },

    /// The owning connection was closed; the transport is gone.
    #[error("Transport released: connection was closed")]
    Released,

    /// Credentials could not be encoded into a request header.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a cannot-connect error.
    #[inline]
    pub fn cannot_connect(source: TransportError) -> Self {
        Self::CannotConnect { source }
    }

    /// Creates an invalid-auth error.
    #[inline]
    pub fn invalid_auth(source: TransportError) -> Self {
        Self::InvalidAuth { source }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an unsupported operation error.
    #[inline]
    pub fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }
}

impl TransportError {
    /// Creates a timeout error.
    #[inline]
    pub fn timeout(method: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            method: method.into(),
            timeout_ms,
        }
    }

    /// Creates a JSON-RPC error.
    #[inline]
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if the device could not be reached.
    #[inline]
    #[must_use]
    pub fn is_cannot_connect(&self) -> bool {
        matches!(self, Self::CannotConnect { .. })
    }

    /// Returns `true` if the device rejected the credentials.
    #[inline]
    #[must_use]
    pub fn is_invalid_auth(&self) -> bool {
        matches!(self, Self::InvalidAuth { .. })
    }
}

impl TransportError {
    /// Returns `true` if this failure is an authorization rejection (HTTP 401).
    ///
    /// Checks the structured status of the HTTP response, of a reqwest error,
    /// or of the WebSocket upgrade response.
    #[must_use]
    pub fn is_auth_rejection(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == StatusCode::UNAUTHORIZED,
            Self::Request(e) => e.status() == Some(StatusCode::UNAUTHORIZED),
            Self::WebSocket(WsError::Http(response)) => {
                response.status().as_u16() == StatusCode::UNAUTHORIZED.as_u16()
            }
            _ => false,
        }
    }

    /// Returns `true` if this is a timeout.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Request(e) => e.is_timeout(),
            _ => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
