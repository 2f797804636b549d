//! In-memory credential store.
//!
//! Holds the OAuth2 bearer token for the process lifetime. There is no
//! refresh-token handling: a restart loses the token and the operator must
//! re-authenticate.

use parking_lot::RwLock;
use std::fmt;

/// Opaque bearer token. The value never appears in `Debug` output.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Shared holder for the current credential.
///
/// Written by the token exchange, read by every API call. Absent until the
/// first successful exchange.
#[derive(Debug, Default)]
pub struct CredentialStore {
    token: RwLock<Option<AccessToken>>,
}

impl CredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored token.
    pub fn set(&self, token: AccessToken) {
        *self.token.write() = Some(token);
    }

    /// Drop the stored token (e.g. after the API rejects it).
    pub fn clear(&self) {
        *self.token.write() = None;
    }

    /// Current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<AccessToken> {
        self.token.read().clone()
    }

    /// True once a token has been stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_lifecycle() {
        let store = CredentialStore::new();
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());

        store.set(AccessToken::new("abc"));
        assert!(store.is_authenticated());
        assert_eq!(store.token().unwrap().expose(), "abc");

        store.clear();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = AccessToken::new("super-secret");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
