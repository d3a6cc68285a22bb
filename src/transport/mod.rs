//! JSON-RPC transport layer.
//!
//! This module provides the capability every connection variant wraps:
//! "invoke a named remote method with parameters, get a parsed result or a
//! transport error".
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Client (Rust)  │      HTTP POST /jsonrpc      │  Kodi           │
//! │                 │─────────────────────────────►│                 │
//! │  Server handle  │                              │  JSON-RPC API   │
//! │  → Transport    │      WebSocket /jsonrpc      │                 │
//! │                 │◄────────────────────────────►│  (+ push)       │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`Transport`] - request/response invocation, implemented by both variants
//! - [`DuplexTransport`] - persistent link with handshake, liveness and push
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `auth` | HTTP Basic credentials |
//! | `http` | Stateless HTTP invoker |
//! | `websocket` | WebSocket link and event loop |

// ============================================================================
// Submodules
// ============================================================================

/// HTTP Basic credentials.
pub mod auth;

/// Stateless HTTP invoker.
pub mod http;

/// WebSocket link and event loop.
pub mod websocket;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

use crate::error::TransportResult;
use crate::protocol::{Notification, Params};

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::Credentials;
pub use http::HttpTransport;
pub use websocket::WsTransport;

// ============================================================================
// Types
// ============================================================================

/// Notification handler callback type.
///
/// Called from the WebSocket event loop for every server-push notification.
/// The handler must not block; it may replace or clear itself.
pub type NotificationHandler = Box<dyn Fn(Notification) + Send + Sync>;

// ============================================================================
// Traits
// ============================================================================

/// Sends JSON-RPC calls to Kodi.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Invokes `method` with `params` and returns the `result` member.
    async fn invoke(&self, method: &str, params: Params) -> TransportResult<Value>;
}

/// A transport backed by a persistent duplex link.
///
/// The same object performs the handshake and all subsequent calls.
#[async_trait]
pub trait DuplexTransport: Transport {
    /// Opens the link. Returns immediately if it is already live.
    async fn open(&self) -> TransportResult<()>;

    /// Returns `true` while the link is established.
    fn is_live(&self) -> bool;

    /// Closes the link. Safe to call when not open.
    async fn close(&self);

    /// Registers the callback receiving server-push notifications.
    fn set_notification_handler(&self, handler: NotificationHandler);

    /// Removes the notification callback.
    fn clear_notification_handler(&self);
}

// ============================================================================
// Server
// ============================================================================

/// Dispatch handle used to invoke remote methods.
///
/// Cheap to clone; all clones share the underlying transport.
#[derive(Clone)]
pub struct Server {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server").finish_non_exhaustive()
    }
}

impl Server {
    /// Wraps a transport.
    #[inline]
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Invokes an arbitrary remote method.
    pub async fn invoke(&self, method: &str, params: Params) -> TransportResult<Value> {
        trace!(method, "Invoking remote method");
        self.transport.invoke(method, params).await
    }

    /// Invokes a remote method without parameters.
    pub async fn call(&self, method: &str) -> TransportResult<Value> {
        self.invoke(method, Params::None).await
    }

    /// Invokes a remote method with call arguments (see [`Params::args`]).
    pub async fn call_with<I>(&self, method: &str, args: I) -> TransportResult<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        self.invoke(method, Params::args(args)).await
    }
}
