//! HTTP session ownership.
//!
//! A connection either creates its own `reqwest::Client` (and releases it on
//! close) or borrows one supplied by the caller (and never releases it). The
//! ownership tag is fixed at construction.

use tracing::debug;

/// Who is responsible for releasing the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOwnership {
    /// Created by the connection; released on close.
    Owned,
    /// Supplied by the caller; never released by the connection.
    Borrowed,
}

/// HTTP session held by a connection.
#[derive(Debug)]
pub struct SessionHandle {
    client: Option<reqwest::Client>,
    ownership: SessionOwnership,
}

impl SessionHandle {
    /// Borrows `supplied` if present, otherwise creates an owned session.
    #[must_use]
    pub fn resolve(supplied: Option<reqwest::Client>) -> Self {
        match supplied {
            Some(client) => Self {
                client: Some(client),
                ownership: SessionOwnership::Borrowed,
            },
            None => Self {
                client: Some(reqwest::Client::new()),
                ownership: SessionOwnership::Owned,
            },
        }
    }

    #[inline]
    #[must_use]
    pub fn ownership(&self) -> SessionOwnership {
        self.ownership
    }

    /// Returns the session unless it has been released.
    #[inline]
    #[must_use]
    pub fn client(&self) -> Option<&reqwest::Client> {
        self.client.as_ref()
    }

    /// Releases an owned session.
    ///
    /// Returns `true` only for the call that actually released it; borrowed
    /// sessions are left untouched and always return `false`.
    pub fn release(&mut self) -> bool {
        if self.ownership == SessionOwnership::Borrowed {
            return false;
        }

        match self.client.take() {
            Some(client) => {
                drop(client);
                debug!("Owned HTTP session released");
                true
            }
            None => false,
        }
    }
}
