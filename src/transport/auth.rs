//! HTTP Basic credentials shared by both transports.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Username/password pair sent as HTTP Basic authentication.
///
/// A missing password is sent as the empty string.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates credentials from a username and optional password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            password: password.unwrap_or_default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[inline]
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the `Authorization` header value, `Basic <base64(user:pass)>`.
    #[must_use]
    pub fn basic_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_header() {
        let credentials = Credentials::new("kodi", Some("secret".into()));
        assert_eq!(credentials.basic_header(), "Basic a29kaTpzZWNyZXQ=");
    }

    #[test]
    fn test_missing_password_is_empty() {
        let credentials = Credentials::new("kodi", None);
        assert_eq!(credentials.password(), "");
        assert_eq!(credentials.basic_header(), "Basic a29kaTo=");
    }

    #[test]
    fn test_debug_redacts_password() {
        let credentials = Credentials::new("kodi", Some("secret".into()));
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("kodi"));
    }
}
