//! Kodi remote - JSON-RPC remote control client for Kodi media centers.
//!
//! This library talks to a Kodi device over its JSON-RPC API, either with
//! stateless HTTP requests or over a persistent WebSocket that also carries
//! server-push notifications.
//!
//! # Architecture
//!
//! ```text
//! Client ──► Connection ──► Server ──► Transport ──► Kodi
//!            (Http | WebSocket)        (HttpTransport | WsTransport)
//! ```
//!
//! - A [`ConnectionConfig`] selects the variant: a WebSocket port means
//!   [`WsConnection`], otherwise [`HttpConnection`]
//! - The [`Connection`] owns the lifecycle (`connect`, `close`, liveness)
//! - The [`Client`] maps domain operations to remote methods
//!
//! # Quick Start
//!
//! ```no_run
//! use kodi_remote::{Client, Connection, ConnectionConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ConnectionConfig::builder()
//!         .host("192.168.1.20")
//!         .username("kodi")
//!         .password("secret")
//!         .ws_port(9090)
//!         .build()?;
//!
//!     let client = Client::new(Connection::new(&config));
//!     client.connect().await?;
//!
//!     if client.ping().await? {
//!         client.play_pause().await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | High-level [`Client`] operations |
//! | [`connection`] | Variant selection and lifecycle |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | JSON-RPC message and parameter types |
//! | [`transport`] | HTTP and WebSocket invokers |

// ============================================================================
// Modules
// ============================================================================

/// High-level client.
pub mod client;

/// Connection factory, variants and configuration.
///
/// Use [`create_connection`] or [`Connection::new`] to pick the variant.
pub mod connection;

/// Error types and result aliases.
///
/// Client operations return [`Result<T>`]; transports return
/// [`TransportResult<T>`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// JSON-RPC protocol types.
pub mod protocol;

/// HTTP and WebSocket transports.
pub mod transport;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Client
pub use client::Client;

// Connection types
pub use connection::{
    Connection, ConnectionConfig, ConnectionConfigBuilder, HttpConnection, SessionOwnership,
    WsConnection, create_connection,
};

// Error types
pub use error::{Error, Result, TransportError, TransportResult};

// Identifier types
pub use identifiers::{PlayerId, PlaylistId, RequestId};

// Protocol types
pub use protocol::{ActivePlayer, Notification, Params};

// Transport types
pub use transport::{Credentials, DuplexTransport, NotificationHandler, Server, Transport};
