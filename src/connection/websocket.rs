//! WebSocket-backed connection.
//!
//! # State Machine
//!
//! ```text
//!               connect() ok
//! Disconnected ──────────────► Connected ──┐ connect(): no-op
//!      ▲   │ connect() err         │  ▲    │
//!      │   └──► Disconnected       │  └────┘
//!      └───── remote hang-up ──────┘
//!
//! any ── close() ──► Closed (terminal)
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result, TransportError, TransportResult};
use crate::transport::{DuplexTransport, NotificationHandler, Server, Transport, WsTransport};

use super::config::ConnectionConfig;
use super::session::{SessionHandle, SessionOwnership};
use super::thumbnail;

/// Connection over a persistent WebSocket; supports push notifications.
pub struct WsConnection {
    /// Duplex transport; `None` once closed.
    transport: Option<Arc<dyn DuplexTransport>>,
    session: SessionHandle,
    image_url: String,
}

impl std::fmt::Debug for WsConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsConnection")
            .field("image_url", &self.image_url)
            .field("session", &self.session.ownership())
            .field("connected", &self.connected())
            .field("closed", &self.transport.is_none())
            .finish()
    }
}

impl WsConnection {
    /// Creates the connection with an unopened [`WsTransport`] bound to
    /// `{ws|wss}://{host}:{ws_port}/jsonrpc`.
    ///
    /// The endpoint falls back to the HTTP port when no WebSocket port is
    /// configured.
    #[must_use]
    pub fn new(config: &ConnectionConfig) -> Self {
        let url = config
            .ws_url()
            .unwrap_or_else(|| config.jsonrpc_url().replacen("http", "ws", 1));

        debug!(%url, "WebSocket connection created");
        let transport = WsTransport::new(url, config.credentials(), config.timeout());
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates the connection around a caller-provided duplex transport.
    #[must_use]
    pub fn with_transport(config: &ConnectionConfig, transport: Arc<dyn DuplexTransport>) -> Self {
        Self {
            transport: Some(transport),
            session: SessionHandle::resolve(config.session().cloned()),
            image_url: config.image_url(),
        }
    }

    /// Performs the handshake unless already connected.
    ///
    /// # Errors
    ///
    /// [`Error::CannotConnect`] if the handshake fails or the connection was
    /// closed.
    pub async fn connect(&self) -> Result<()> {
        let transport = self
            .transport
            .as_ref()
            .ok_or_else(|| Error::cannot_connect(TransportError::Released))?;

        if transport.is_live() {
            return Ok(());
        }

        transport.open().await.map_err(Error::cannot_connect)
    }

    /// Closes the socket and releases an owned session. Idempotent.
    pub async fn close(&mut self) {
        if let Some(transport) = self.transport.take() {
            transport.close().await;
            debug!("WebSocket connection closed");
        }
        self.session.release();
    }

    /// `true` iff the socket is currently live; checked on every call.
    #[must_use]
    pub fn connected(&self) -> bool {
        self.transport
            .as_ref()
            .is_some_and(|transport| transport.is_live())
    }

    /// Returns the dispatch handle (the same transport that handshakes).
    ///
    /// # Errors
    ///
    /// [`TransportError::Released`] after [`close`](Self::close).
    pub fn server(&self) -> TransportResult<Server> {
        let transport = self.transport.as_ref().ok_or(TransportError::Released)?;
        let transport: Arc<dyn Transport> = transport.clone();
        Ok(Server::new(transport))
    }

    /// Registers the push notification callback.
    ///
    /// # Errors
    ///
    /// [`TransportError::Released`] after [`close`](Self::close).
    pub fn set_notification_handler(&self, handler: NotificationHandler) -> Result<()> {
        let transport = self.transport.as_ref().ok_or(TransportError::Released)?;
        transport.set_notification_handler(handler);
        Ok(())
    }

    /// Removes the push notification callback.
    pub fn clear_notification_handler(&self) {
        if let Some(transport) = &self.transport {
            transport.clear_notification_handler();
        }
    }

    #[inline]
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&reqwest::Client> {
        self.session.client()
    }

    #[inline]
    #[must_use]
    pub fn session_ownership(&self) -> SessionOwnership {
        self.session.ownership()
    }

    /// See [`thumbnail::thumbnail_url`].
    #[must_use]
    pub fn thumbnail_url(&self, reference: Option<&str>) -> Option<String> {
        thumbnail::thumbnail_url(&self.image_url, reference)
    }
}
