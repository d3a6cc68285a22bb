//! JSON-RPC 2.0 envelope types.
//!
//! Defines the request, response and notification messages exchanged with
//! Kodi over both transports.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{TransportError, TransportResult};
use crate::identifiers::RequestId;

// ============================================================================
// Constants
// ============================================================================

/// Protocol version tag sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

// ============================================================================
// Params
// ============================================================================

/// Parameters of a remote method call.
///
/// JSON-RPC allows either by-position (array) or by-name (object) parameters.
/// An empty parameter set is omitted from the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Params {
    /// No parameters.
    #[default]
    None,
    /// By-position parameters.
    Positional(Vec<Value>),
    /// By-name parameters.
    Named(Map<String, Value>),
}

impl Params {
    /// Builds parameters from a list of call arguments.
    ///
    /// A single object argument is sent by-name, no arguments are omitted,
    /// anything else is sent by-position.
    #[must_use]
    pub fn args(args: impl IntoIterator<Item = Value>) -> Self {
        let mut args: Vec<Value> = args.into_iter().collect();
        match args.len() {
            0 => Self::None,
            1 if args[0].is_object() => match args.pop() {
                Some(Value::Object(map)) => Self::Named(map),
                _ => Self::None,
            },
            _ => Self::Positional(args),
        }
    }

    /// Builds by-name parameters. An empty map means no parameters.
    #[must_use]
    pub fn named(map: Map<String, Value>) -> Self {
        if map.is_empty() {
            Self::None
        } else {
            Self::Named(map)
        }
    }

    /// Returns `true` if no parameters will be sent.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Positional(args) => args.is_empty(),
            Self::Named(map) => map.is_empty(),
        }
    }
}

impl From<Value> for Params {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::None,
            Value::Array(args) => Self::Positional(args),
            Value::Object(map) => Self::Named(map),
            other => Self::Positional(vec![other]),
        }
    }
}

// ============================================================================
// Request
// ============================================================================

/// A JSON-RPC request from the client to Kodi.
///
/// # Format
///
/// ```json
/// {
///   "jsonrpc": "2.0",
///   "id": "uuid",
///   "method": "Player.PlayPause",
///   "params": [1, "toggle"]
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Protocol version, always `"2.0"`.
    pub jsonrpc: &'static str,

    /// Unique identifier for request/response correlation.
    pub id: RequestId,

    /// Remote method in `Namespace.Method` form.
    pub method: String,

    /// Call parameters.
    #[serde(skip_serializing_if = "Params::is_empty")]
    pub params: Params,
}

impl Request {
    /// Creates a new request with auto-generated ID.
    #[inline]
    #[must_use]
    pub fn new(method: impl Into<String>, params: Params) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: RequestId::generate(),
            method: method.into(),
            params,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// A JSON-RPC response from Kodi.
///
/// Exactly one of `result` and `error` is expected to be present.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: RequestId,

    /// Result data (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error object (if error).
    #[serde(default)]
    pub error: Option<RpcError>,
}

impl Response {
    /// Returns `true` if this is an error response.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Extracts the result value, returning error if response was error.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Rpc`] if the response carried an error object.
    pub fn into_result(self) -> TransportResult<Value> {
        match self.error {
            Some(error) => Err(TransportError::rpc(error.code, error.message)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcError {
    /// Error code (`-32601` method not found, `-32602` invalid params, ...).
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details.
    #[serde(default)]
    pub data: Option<Value>,
}

// ============================================================================
// Notification
// ============================================================================

/// A server-push notification (no `id`), e.g. `Player.OnPlay`.
///
/// Only delivered over the WebSocket transport.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    /// Notification name in `Namespace.OnEvent` form.
    pub method: String,

    /// Notification payload, usually `{"data": ..., "sender": "xbmc"}`.
    #[serde(default)]
    pub params: Value,
}

impl Notification {
    /// Returns the `data` member of the payload.
    #[inline]
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.params.get("data")
    }

    /// Returns the `sender` member of the payload.
    #[inline]
    #[must_use]
    pub fn sender(&self) -> Option<&str> {
        self.params.get("sender").and_then(Value::as_str)
    }
}

// ============================================================================
// Tests
// ============================================================================
