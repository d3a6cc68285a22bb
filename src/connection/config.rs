//! Connection configuration and its builder.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use kodi_remote::ConnectionConfig;
//!
//! # fn example() -> kodi_remote::Result<()> {
//! let config = ConnectionConfig::builder()
//!     .host("192.168.1.20")
//!     .port(8080)
//!     .ws_port(9090)
//!     .username("kodi")
//!     .password("secret")
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::transport::Credentials;

// ============================================================================
// Constants
// ============================================================================

/// Default Kodi web server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default per-request and handshake timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// ConnectionConfig
// ============================================================================

/// Immutable description of how to reach one Kodi device.
///
/// The presence of [`ws_port`](Self::ws_port) selects the WebSocket variant.
#[derive(Clone)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    ws_port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    ssl: bool,
    timeout: Duration,
    session: Option<reqwest::Client>,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("ws_port", &self.ws_port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("ssl", &self.ssl)
            .field("timeout", &self.timeout)
            .field("shared_session", &self.session.is_some())
            .finish()
    }
}

impl ConnectionConfig {
    /// Creates an HTTP configuration with defaults for everything but the
    /// address.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ws_port: None,
            username: None,
            password: None,
            ssl: false,
            timeout: DEFAULT_TIMEOUT,
            session: None,
        }
    }

    /// Returns a builder for a validated configuration.
    #[inline]
    #[must_use]
    pub fn builder() -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::new()
    }
}

// ============================================================================
// ConnectionConfig - Accessors
// ============================================================================

impl ConnectionConfig {
    #[inline]
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// WebSocket port; `Some` selects the push-capable variant.
    #[inline]
    #[must_use]
    pub fn ws_port(&self) -> Option<u16> {
        self.ws_port
    }

    #[inline]
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn ssl(&self) -> bool {
        self.ssl
    }

    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Externally owned HTTP session, if one was supplied.
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&reqwest::Client> {
        self.session.as_ref()
    }

    /// Basic credentials, present iff a username is configured.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        self.username
            .as_ref()
            .map(|username| Credentials::new(username.clone(), self.password.clone()))
    }
}

// ============================================================================
// ConnectionConfig - Setters
// ============================================================================

impl ConnectionConfig {
    /// Sets the WebSocket port, selecting the push-capable transport.
    #[inline]
    #[must_use]
    pub fn with_ws_port(mut self, ws_port: u16) -> Self {
        self.ws_port = Some(ws_port);
        self
    }

    /// Sets Basic credentials. A missing password is sent as empty.
    #[inline]
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: Option<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = password;
        self
    }

    /// Uses `https`/`wss` instead of `http`/`ws`.
    #[inline]
    #[must_use]
    pub fn with_ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    /// Sets the handshake and per-request timeout.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Supplies an externally owned HTTP session, borrowed by connections.
    #[inline]
    #[must_use]
    pub fn with_session(mut self, session: reqwest::Client) -> Self {
        self.session = Some(session);
        self
    }
}

// ============================================================================
// ConnectionConfig - Derived URLs
// ============================================================================

impl ConnectionConfig {
    fn http_scheme(&self) -> &'static str {
        if self.ssl { "https" } else { "http" }
    }

    fn ws_scheme(&self) -> &'static str {
        if self.ssl { "wss" } else { "ws" }
    }

    /// `host:port`, bracketing bare IPv6 literals.
    fn authority(&self, port: u16) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{port}", self.host)
        } else {
            format!("{}:{port}", self.host)
        }
    }

    /// `{http|https}://{host}:{port}/jsonrpc`
    #[must_use]
    pub fn jsonrpc_url(&self) -> String {
        format!("{}://{}/jsonrpc", self.http_scheme(), self.authority(self.port))
    }

    /// `{ws|wss}://{host}:{ws_port}/jsonrpc`, if a WebSocket port is set.
    #[must_use]
    pub fn ws_url(&self) -> Option<String> {
        self.ws_port
            .map(|ws_port| format!("{}://{}/jsonrpc", self.ws_scheme(), self.authority(ws_port)))
    }

    /// `{http|https}://[{username}:{password}@]{host}:{port}/image`
    #[must_use]
    pub fn image_url(&self) -> String {
        let auth = match &self.username {
            Some(username) => format!(
                "{username}:{}@",
                self.password.as_deref().unwrap_or_default()
            ),
            None => String::new(),
        };

        format!(
            "{}://{auth}{}/image",
            self.http_scheme(),
            self.authority(self.port)
        )
    }
}

// ============================================================================
// ConnectionConfigBuilder
// ============================================================================

/// Builder for [`ConnectionConfig`].
///
/// Use [`ConnectionConfig::builder()`] to create a new builder.
#[derive(Default, Clone)]
pub struct ConnectionConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    ws_port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    ssl: bool,
    timeout: Option<Duration>,
    session: Option<reqwest::Client>,
}

impl fmt::Debug for ConnectionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfigBuilder")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("ws_port", &self.ws_port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("ssl", &self.ssl)
            .finish_non_exhaustive()
    }
}

impl ConnectionConfigBuilder {
    /// Creates a builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the device host name or IP address.
    #[inline]
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the web server port (default 8080).
    #[inline]
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the WebSocket port, selecting the push-capable transport.
    #[inline]
    #[must_use]
    pub fn ws_port(mut self, ws_port: u16) -> Self {
        self.ws_port = Some(ws_port);
        self
    }

    #[inline]
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Uses `https`/`wss` instead of `http`/`ws`.
    #[inline]
    #[must_use]
    pub fn ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    /// Sets the handshake and per-request timeout (default 5s).
    #[inline]
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Supplies an externally owned HTTP session.
    ///
    /// The connection borrows it and never releases it on close.
    #[inline]
    #[must_use]
    pub fn session(mut self, session: reqwest::Client) -> Self {
        self.session = Some(session);
        self
    }

    /// Builds the configuration with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the host is missing or empty
    /// - [`Error::Config`] if a password is set without a username
    pub fn build(self) -> Result<ConnectionConfig> {
        let host = self
            .host
            .filter(|host| !host.trim().is_empty())
            .ok_or_else(|| {
                Error::config(
                    "Host is required. Use .host() to set it.\n\
                     Example: ConnectionConfig::builder().host(\"192.168.1.20\")",
                )
            })?;

        if self.password.is_some() && self.username.is_none() {
            return Err(Error::config(
                "Password given without username. Use .username() as well.",
            ));
        }

        Ok(ConnectionConfig {
            host,
            port: self.port.unwrap_or(DEFAULT_PORT),
            ws_port: self.ws_port,
            username: self.username,
            password: self.password,
            ssl: self.ssl,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            session: self.session,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
