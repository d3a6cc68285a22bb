//! JSON-RPC protocol message types.
//!
//! This module defines the message format exchanged with Kodi's
//! `/jsonrpc` endpoint.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Client → Kodi | Method call |
//! | `Response` | Kodi → Client | Method result or error |
//! | `Notification` | Kodi → Client | Server push (WebSocket only) |
//!
//! # Method Naming
//!
//! Methods follow `Namespace.Method` format:
//!
//! - `Player.PlayPause`
//! - `AudioLibrary.GetAlbums`
//! - `Playlist.Add`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `methods` | Method names by namespace |
//! | `request` | Request, Response and Notification types |
//! | `types` | Typed parameter objects |

// ============================================================================
// Submodules
// ============================================================================

/// Method names organized by namespace.
pub mod methods;

/// Request, Response and Notification message types.
pub mod request;

/// Typed parameter and result objects.
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use request::{Notification, Params, Request, Response, RpcError};
pub use types::{ActivePlayer, GoTo, PlayItem, PlayState, PlaylistItem, SeekTime};
