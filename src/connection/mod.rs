//! Connection lifecycle and transport selection.
//!
//! This module decides which transport to use, establishes and tears it
//! down, and exposes the dispatch handle the [`Client`](crate::Client) uses.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Connection`] | Tagged union over the two variants |
//! | [`HttpConnection`] | Stateless HTTP, always connected |
//! | [`WsConnection`] | Persistent WebSocket, push-capable |
//! | [`ConnectionConfig`] | Immutable connection parameters |
//! | [`SessionOwnership`] | Whether close releases the HTTP session |
//!
//! # Example
//!
//! ```no_run
//! use kodi_remote::{Connection, ConnectionConfig};
//!
//! # async fn example() -> kodi_remote::Result<()> {
//! let config = ConnectionConfig::builder()
//!     .host("192.168.1.20")
//!     .ws_port(9090)
//!     .build()?;
//!
//! let mut connection = Connection::new(&config);
//! connection.connect().await?;
//! assert!(connection.can_subscribe());
//! connection.close().await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Connection parameters and builder.
pub mod config;

/// HTTP-backed connection.
pub mod http;

/// HTTP session ownership.
pub mod session;

/// `image://` reference rewriting.
pub mod thumbnail;

/// WebSocket-backed connection.
pub mod websocket;

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::error::{Error, Result, TransportResult};
use crate::transport::{NotificationHandler, Server};

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ConnectionConfig, ConnectionConfigBuilder};
pub use http::HttpConnection;
pub use session::SessionOwnership;
pub use websocket::WsConnection;

// ============================================================================
// Connection
// ============================================================================

/// A connection to one Kodi device.
///
/// Callers never need to branch on the variant; every operation is available
/// on the enum itself.
#[derive(Debug)]
pub enum Connection {
    /// One HTTP POST per call.
    Http(HttpConnection),
    /// Persistent WebSocket with push notifications.
    WebSocket(WsConnection),
}

/// Builds a connection for `config`. See [`Connection::new`].
#[inline]
#[must_use]
pub fn create_connection(config: &ConnectionConfig) -> Connection {
    Connection::new(config)
}

impl Connection {
    /// Selects the variant: WebSocket iff a WebSocket port is configured.
    ///
    /// Performs no I/O and cannot fail.
    #[must_use]
    pub fn new(config: &ConnectionConfig) -> Self {
        debug!(
            host = %config.host(),
            port = config.port(),
            ws_port = ?config.ws_port(),
            "Creating connection"
        );

        match config.ws_port() {
            None => Self::Http(HttpConnection::new(config)),
            Some(_) => Self::WebSocket(WsConnection::new(config)),
        }
    }

    /// Establishes the transport. Idempotent; a no-op for HTTP.
    ///
    /// # Errors
    ///
    /// [`Error::CannotConnect`] if the WebSocket handshake fails.
    pub async fn connect(&self) -> Result<()> {
        match self {
            Self::Http(conn) => conn.connect().await,
            Self::WebSocket(conn) => conn.connect().await,
        }
    }

    /// Releases the transport and, if owned, the session.
    ///
    /// Safe to call repeatedly. The connection must not be reused afterwards.
    pub async fn close(&mut self) {
        match self {
            Self::Http(conn) => conn.close().await,
            Self::WebSocket(conn) => conn.close().await,
        }
    }

    /// Whether the transport is usable right now.
    #[must_use]
    pub fn connected(&self) -> bool {
        match self {
            Self::Http(conn) => conn.connected(),
            Self::WebSocket(conn) => conn.connected(),
        }
    }

    /// Whether server-push notifications are available.
    #[inline]
    #[must_use]
    pub fn can_subscribe(&self) -> bool {
        matches!(self, Self::WebSocket(_))
    }

    /// Returns the dispatch handle used to invoke remote methods.
    ///
    /// # Errors
    ///
    /// [`TransportError::Released`](crate::TransportError::Released) after
    /// [`close`](Self::close).
    pub fn server(&self) -> TransportResult<Server> {
        match self {
            Self::Http(conn) => conn.server(),
            Self::WebSocket(conn) => conn.server(),
        }
    }

    /// Rewrites an `image://` artwork reference into a fetchable URL.
    #[must_use]
    pub fn thumbnail_url(&self, reference: Option<&str>) -> Option<String> {
        match self {
            Self::Http(conn) => conn.thumbnail_url(reference),
            Self::WebSocket(conn) => conn.thumbnail_url(reference),
        }
    }

    /// Base URL of the device's image endpoint.
    #[must_use]
    pub fn image_url(&self) -> &str {
        match self {
            Self::Http(conn) => conn.image_url(),
            Self::WebSocket(conn) => conn.image_url(),
        }
    }

    /// HTTP session, for fetching artwork with the same connection pool.
    ///
    /// `None` once an owned session has been released by `close`.
    #[must_use]
    pub fn session(&self) -> Option<&reqwest::Client> {
        match self {
            Self::Http(conn) => conn.session(),
            Self::WebSocket(conn) => conn.session(),
        }
    }

    #[must_use]
    pub fn session_ownership(&self) -> SessionOwnership {
        match self {
            Self::Http(conn) => conn.session_ownership(),
            Self::WebSocket(conn) => conn.session_ownership(),
        }
    }

    /// Registers the callback receiving push notifications.
    ///
    /// # Errors
    ///
    /// - [`Error::Unsupported`] on the HTTP variant
    /// - [`Error::Transport`] after [`close`](Self::close)
    pub fn set_notification_handler(&self, handler: NotificationHandler) -> Result<()> {
        match self {
            Self::Http(_) => Err(Error::unsupported("set_notification_handler")),
            Self::WebSocket(conn) => conn.set_notification_handler(handler),
        }
    }

    /// Removes the notification callback. No-op on the HTTP variant.
    pub fn clear_notification_handler(&self) {
        if let Self::WebSocket(conn) = self {
            conn.clear_notification_handler();
        }
    }
}

impl From<HttpConnection> for Connection {
    fn from(conn: HttpConnection) -> Self {
        Self::Http(conn)
    }
}

impl From<WsConnection> for Connection {
    fn from(conn: WsConnection) -> Self {
        Self::WebSocket(conn)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::Ordering;

    use proptest::prelude::*;
    use serde_json::json;

    use crate::error::TransportError;
    use crate::protocol::{Notification, Params};
    use crate::testing::{MockDuplex, MockTransport};

    fn http_config() -> ConnectionConfig {
        ConnectionConfig::new("kodi.local", 8080)
    }

    fn ws_config() -> ConnectionConfig {
        ConnectionConfig::builder()
            .host("kodi.local")
            .ws_port(9090)
            .build()
            .expect("build")
    }

    #[test]
    fn test_factory_without_ws_port_is_http() {
        let connection = Connection::new(&http_config());
        assert!(matches!(connection, Connection::Http(_)));
        assert!(!connection.can_subscribe());
    }

    #[test]
    fn test_factory_with_ws_port_is_websocket() {
        let connection = create_connection(&ws_config());
        assert!(matches!(connection, Connection::WebSocket(_)));
        assert!(connection.can_subscribe());
    }

    proptest! {
        #[test]
        fn factory_variant_follows_ws_port(
            host in "[a-z][a-z0-9.-]{0,20}",
            port in any::<u16>(),
            ws_port in proptest::option::of(any::<u16>()),
        ) {
            let mut config = ConnectionConfig::new(host, port);
            if let Some(ws_port) = ws_port {
                config = config.with_ws_port(ws_port);
            }

            let connection = create_connection(&config);
            let is_websocket = matches!(connection, Connection::WebSocket(_));
            prop_assert_eq!(is_websocket, ws_port.is_some());
            prop_assert_eq!(connection.can_subscribe(), ws_port.is_some());
            prop_assert_eq!(connection.connected(), ws_port.is_none());
        }
    }

    #[test]
    fn test_http_connected_before_connect() {
        let connection = Connection::new(&http_config());
        assert!(connection.connected());
    }

    #[test]
    fn test_ws_not_connected_before_connect() {
        let connection = Connection::new(&ws_config());
        assert!(!connection.connected());
    }

    #[test]
    fn test_image_url_independent_of_variant() {
        let http = Connection::new(&http_config());
        let ws = Connection::new(&ws_config());
        assert_eq!(http.image_url(), "http://kodi.local:8080/image");
        assert_eq!(http.image_url(), ws.image_url());
    }

    #[test]
    fn test_thumbnail_url_delegates() {
        let connection = Connection::new(&http_config());
        assert_eq!(connection.thumbnail_url(None), None);
        assert_eq!(
            connection.thumbnail_url(Some("image://foo%20bar/")).as_deref(),
            Some("http://kodi.local:8080/image/image%3A%2F%2Ffoo%2520bar%2F")
        );
        assert_eq!(connection.thumbnail_url(Some("http://example.com/x.jpg")), None);
    }

    #[tokio::test]
    async fn test_http_connect_is_noop() {
        let transport = MockTransport::with_players(0);
        let connection: Connection =
            HttpConnection::with_transport(&http_config(), transport.clone()).into();

        connection.connect().await.expect("connect");
        connection.connect().await.expect("connect again");
        assert!(connection.connected());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ws_connect_handshakes_once() {
        let duplex = MockDuplex::new(MockTransport::with_players(0));
        let connection: Connection =
            WsConnection::with_transport(&ws_config(), duplex.clone()).into();

        assert!(!connection.connected());
        connection.connect().await.expect("first connect");
        assert!(connection.connected());
        connection.connect().await.expect("second connect");

        assert_eq!(duplex.opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ws_connected_is_rechecked() {
        let duplex = MockDuplex::new(MockTransport::with_players(0));
        let connection: Connection =
            WsConnection::with_transport(&ws_config(), duplex.clone()).into();

        connection.connect().await.expect("connect");
        duplex.drop_link();
        assert!(!connection.connected());

        connection.connect().await.expect("reconnect");
        assert_eq!(duplex.opens.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ws_handshake_failure_is_cannot_connect() {
        let duplex = MockDuplex::failing();
        let connection: Connection = WsConnection::with_transport(&ws_config(), duplex).into();

        let err = connection.connect().await.unwrap_err();
        assert!(err.is_cannot_connect());
        assert!(!connection.connected());
    }

    #[tokio::test]
    async fn test_ws_server_is_handshake_transport() {
        let inner = MockTransport::with_players(0);
        let duplex = MockDuplex::new(inner.clone());
        let connection: Connection = WsConnection::with_transport(&ws_config(), duplex).into();

        connection.connect().await.expect("connect");
        let server = connection.server().expect("server");
        server.invoke("JSONRPC.Ping", Params::None).await.expect("invoke");

        assert_eq!(inner.methods(), vec!["JSONRPC.Ping".to_string()]);
    }

    #[tokio::test]
    async fn test_close_owned_session_releases_it() {
        let mut connection = Connection::new(&http_config());
        assert_eq!(connection.session_ownership(), SessionOwnership::Owned);

        connection.close().await;
        assert!(connection.session().is_none());
        assert!(!connection.connected());

        connection.close().await;
        assert!(connection.session().is_none());
    }

    #[tokio::test]
    async fn test_close_borrowed_session_keeps_it() {
        let shared = reqwest::Client::new();
        let config = ConnectionConfig::builder()
            .host("kodi.local")
            .session(shared)
            .build()
            .expect("build");

        let mut connection = Connection::new(&config);
        assert_eq!(connection.session_ownership(), SessionOwnership::Borrowed);

        connection.close().await;
        connection.close().await;
        assert!(connection.session().is_some());
    }

    #[tokio::test]
    async fn test_ws_close_is_idempotent() {
        let duplex = MockDuplex::new(MockTransport::with_players(0));
        let mut connection: Connection =
            WsConnection::with_transport(&ws_config(), duplex.clone()).into();

        connection.connect().await.expect("connect");
        connection.close().await;
        connection.close().await;

        assert_eq!(duplex.closes.load(Ordering::SeqCst), 1);
        assert!(!connection.connected());
        assert!(matches!(connection.server(), Err(TransportError::Released)));

        let err = connection.connect().await.unwrap_err();
        assert!(err.is_cannot_connect());
    }

    #[tokio::test]
    async fn test_notification_handler_only_on_websocket() {
        let http = Connection::new(&http_config());
        let err = http.set_notification_handler(Box::new(|_: Notification| {})).unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));

        let duplex = MockDuplex::new(MockTransport::with_players(0));
        let ws: Connection = WsConnection::with_transport(&ws_config(), duplex.clone()).into();
        ws.set_notification_handler(Box::new(|_: Notification| {})).expect("handler");
        assert!(duplex.handler.lock().is_some());

        ws.clear_notification_handler();
        assert!(duplex.handler.lock().is_none());
    }

    #[tokio::test]
    async fn test_server_forwards_params() {
        let transport = MockTransport::with_players(0);
        let connection: Connection =
            HttpConnection::with_transport(&http_config(), transport.clone()).into();

        connection
            .server()
            .expect("server")
            .call_with("Application.SetMute", [json!(true)])
            .await
            .expect("invoke");

        assert_eq!(transport.calls()[0].params, json!([true]));
    }
}
