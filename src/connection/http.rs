//! HTTP-backed connection.
//!
//! No handshake: the connection reports connected from construction until
//! [`close`](HttpConnection::close). Push notifications are unavailable.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, TransportError, TransportResult};
use crate::transport::{HttpTransport, Server, Transport};

use super::config::ConnectionConfig;
use super::session::{SessionHandle, SessionOwnership};
use super::thumbnail;

/// Connection using one HTTP POST per call.
pub struct HttpConnection {
    /// Stateless invoker; `None` once closed.
    transport: Option<Arc<dyn Transport>>,
    session: SessionHandle,
    image_url: String,
}

impl std::fmt::Debug for HttpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConnection")
            .field("image_url", &self.image_url)
            .field("session", &self.session.ownership())
            .field("closed", &self.transport.is_none())
            .finish()
    }
}

impl HttpConnection {
    /// Creates the connection with a [`HttpTransport`] bound to
    /// `{scheme}://{host}:{port}/jsonrpc`.
    #[must_use]
    pub fn new(config: &ConnectionConfig) -> Self {
        let session = SessionHandle::resolve(config.session().cloned());
        let client = session.client().cloned().unwrap_or_default();

        let transport = HttpTransport::new(
            client,
            config.jsonrpc_url(),
            config.credentials(),
            config.timeout(),
        );

        debug!(endpoint = %transport.endpoint(), "HTTP connection created");
        Self::from_parts(config, session, Arc::new(transport))
    }

    /// Creates the connection around a caller-provided transport.
    #[must_use]
    pub fn with_transport(config: &ConnectionConfig, transport: Arc<dyn Transport>) -> Self {
        let session = SessionHandle::resolve(config.session().cloned());
        Self::from_parts(config, session, transport)
    }

    fn from_parts(
        config: &ConnectionConfig,
        session: SessionHandle,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            transport: Some(transport),
            session,
            image_url: config.image_url(),
        }
    }

    /// No-op; HTTP has no handshake.
    pub async fn connect(&self) -> Result<()> {
        Ok(())
    }

    /// Drops the invoker and releases an owned session. Idempotent.
    pub async fn close(&mut self) {
        if self.transport.take().is_some() {
            debug!("HTTP connection closed");
        }
        self.session.release();
    }

    /// `true` until closed.
    #[inline]
    #[must_use]
    pub fn connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Returns the dispatch handle.
    ///
    /// # Errors
    ///
    /// [`TransportError::Released`] after [`close`](Self::close).
    pub fn server(&self) -> TransportResult<Server> {
        self.transport
            .as_ref()
            .map(|transport| Server::new(Arc::clone(transport)))
            .ok_or(TransportError::Released)
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
