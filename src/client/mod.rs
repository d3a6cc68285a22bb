//! High-level Kodi client.
//!
//! [`Client`] wraps one [`Connection`] and turns domain operations into one
//! or two remote method calls. Operations are grouped by Kodi namespace:
//!
//! | File | Operations |
//! |------|------------|
//! | `application` | properties, volume, mute, on-screen notifications |
//! | `player` | transport control, seeking, opening items, shuffle |
//! | `library` | artists, albums, songs |
//! | `playlist` | default playlist management |
//!
//! Control operations act on the first active player and are silent no-ops
//! when nothing is playing.

// ============================================================================
// Submodules
// ============================================================================

mod application;
mod library;
mod player;
mod playlist;

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::connection::Connection;
use crate::error::{Error, Result, TransportError};
use crate::protocol::methods::{PING_REPLY, jsonrpc, player as player_methods};
use crate::protocol::{ActivePlayer, Params};
use crate::transport::Server;

// ============================================================================
// Client
// ============================================================================

/// High-level interface to one Kodi device.
///
/// # Example
///
/// ```no_run
/// use kodi_remote::{Client, Connection, ConnectionConfig};
///
/// # async fn example() -> kodi_remote::Result<()> {
/// let config = ConnectionConfig::new("192.168.1.20", 8080);
/// let client = Client::new(Connection::new(&config));
///
/// if client.ping().await? {
///     client.play_pause().await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    connection: Connection,
}

impl Client {
    /// Creates a client over `connection`.
    #[inline]
    #[must_use]
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Returns the underlying connection.
    #[inline]
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Consumes the client, returning the connection.
    #[inline]
    #[must_use]
    pub fn into_connection(self) -> Connection {
        self.connection
    }

    /// See [`Connection::connect`].
    pub async fn connect(&self) -> Result<()> {
        self.connection.connect().await
    }

    /// See [`Connection::close`].
    pub async fn close(&mut self) {
        self.connection.close().await;
    }

    /// See [`Connection::can_subscribe`].
    #[inline]
    #[must_use]
    pub fn can_subscribe(&self) -> bool {
        self.connection.can_subscribe()
    }

    /// See [`Connection::thumbnail_url`].
    #[must_use]
    pub fn thumbnail_url(&self, reference: Option<&str>) -> Option<String> {
        self.connection.thumbnail_url(reference)
    }

    pub(crate) fn server(&self) -> Result<Server> {
        Ok(self.connection.server()?)
    }
}

// ============================================================================
// Client - Core Calls
// ============================================================================

impl Client {
    /// Checks that the device answers `JSONRPC.Ping` with `"pong"`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAuth`] if the device rejected the credentials
    /// - [`Error::Transport`] carrying [`TransportError::Rpc`] if the device
    ///   answered with a JSON-RPC error object
    /// - [`Error::CannotConnect`] on any other transport failure
    pub async fn ping(&self) -> Result<bool> {
        let outcome = match self.connection.server() {
            Ok(server) => server.call(jsonrpc::PING).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(reply) => Ok(reply.as_str() == Some(PING_REPLY)),
            Err(e) if e.is_auth_rejection() => {
                warn!(error = %e, "Ping rejected: invalid credentials");
                Err(Error::invalid_auth(e))
            }
            Err(e @ TransportError::Rpc { .. }) => Err(Error::Transport(e)),
            Err(e) => {
                debug!(error = %e, "Ping failed");
                Err(Error::cannot_connect(e))
            }
        }
    }

    /// Invokes an arbitrary remote method with by-name parameters.
    ///
    /// No validation is performed; failures propagate unmodified as
    /// [`Error::Transport`].
    pub async fn call_method(&self, method: &str, params: Map<String, Value>) -> Result<Value> {
        Ok(self.server()?.invoke(method, Params::named(params)).await?)
    }

    /// Returns the active players.
    pub async fn get_players(&self) -> Result<Vec<ActivePlayer>> {
        let players = self
            .server()?
            .call(player_methods::GET_ACTIVE_PLAYERS)
            .await?;
        let players = serde_json::from_value(players).map_err(TransportError::from)?;
        Ok(players)
    }

    /// Returns the first active player, the target of control operations.
    pub(crate) async fn active_player(
        &self,
        operation: &'static str,
    ) -> Result<Option<ActivePlayer>> {
        let player = self.get_players().await?.into_iter().next();
        if player.is_none() {
            debug!(operation, "No active player; skipping");
        }
        Ok(player)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::sync::Arc;

    use reqwest::StatusCode;
    use serde_json::json;
    use tokio_test::assert_err;

    use crate::connection::{ConnectionConfig, HttpConnection};
    use crate::testing::MockTransport;

    pub(crate) fn client_with(transport: Arc<MockTransport>) -> Client {
        let config = ConnectionConfig::new("kodi.local", 8080);
        Client::new(HttpConnection::with_transport(&config, transport).into())
    }

    #[tokio::test]
    async fn test_ping_pong() {
        let client = client_with(MockTransport::new(|_| Ok(json!("pong"))));
        assert!(client.ping().await.expect("ping"));
    }

    #[tokio::test]
    async fn test_ping_other_reply_is_false() {
        let client = client_with(MockTransport::new(|_| Ok(json!("PONG"))));
        assert!(!client.ping().await.expect("ping"));
    }

    #[tokio::test]
    async fn test_ping_unauthorized_is_invalid_auth() {
        let client = client_with(MockTransport::new(|_| {
            Err(TransportError::Http {
                status: StatusCode::UNAUTHORIZED,
                body: String::new(),
            })
        }));

        let err = client.ping().await.unwrap_err();
        assert!(err.is_invalid_auth());
    }

    #[tokio::test]
    async fn test_ping_other_failure_is_cannot_connect() {
        let client = client_with(MockTransport::new(|_| {
            Err(TransportError::ConnectionClosed)
        }));

        let err = assert_err!(client.ping().await);
        assert!(err.is_cannot_connect());
    }

    #[tokio::test]
    async fn test_ping_remote_error_is_passed_through() {
        let client = client_with(MockTransport::new(|_| {
            Err(TransportError::rpc(-32601, "Method not found."))
        }));

        let err = assert_err!(client.ping().await);
        assert!(matches!(err, Error::Transport(TransportError::Rpc { code: -32601, .. })));
        assert!(!err.is_cannot_connect());
    }

    #[tokio::test]
    async fn test_ping_after_close_is_cannot_connect() {
        let mut client = client_with(MockTransport::new(|_| Ok(json!("pong"))));
        client.close().await;

        let err = client.ping().await.unwrap_err();
        assert!(err.is_cannot_connect());
    }

    #[tokio::test]
    async fn test_call_method_named_params() {
        let transport = MockTransport::new(|_| Ok(json!({"version": {"major": 13}})));
        let client = client_with(transport.clone());

        let mut params = Map::new();
        params.insert("properties".into(), json!(["version"]));
        let result = client
            .call_method("JSONRPC.Version", params)
            .await
            .expect("call");

        assert_eq!(result["version"]["major"], 13);
        let calls = transport.calls();
        assert_eq!(calls[0].method, "JSONRPC.Version");
        assert_eq!(calls[0].params, json!({"properties": ["version"]}));
    }

    #[tokio::test]
    async fn test_call_method_failure_is_not_reclassified() {
        let client = client_with(MockTransport::new(|_| {
            Err(TransportError::Http {
                status: StatusCode::UNAUTHORIZED,
                body: String::new(),
            })
        }));

        let err = client.call_method("Foo.Bar", Map::new()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Http { .. })));
    }

    #[tokio::test]
    async fn test_get_players() {
        let client = client_with(MockTransport::with_players(2));
        let players = client.get_players().await.expect("players");
        assert_eq!(players.len(), 2);
        assert_eq!(players[1].player_id.get(), 1);
    }

    #[tokio::test]
    async fn test_thumbnail_url_delegates() {
        let client = client_with(MockTransport::with_players(0));
        assert_eq!(
            client.thumbnail_url(Some("image://a/")).as_deref(),
            Some("http://kodi.local:8080/image/image%3A%2F%2Fa%2F")
        );
    }
}
