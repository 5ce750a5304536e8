//! Authenticated identity handed to the favorites gateway.

use secrecy::{ExposeSecret, SecretString};

use vitrina_core::{User, UserId};

/// A signed-in user plus the bearer token that scopes remote requests.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Identity {
    user: User,
    access_token: SecretString,
}

impl Identity {
    /// Create a new identity.
    #[must_use]
    pub const fn new(user: User, access_token: SecretString) -> Self {
        Self { user, access_token }
    }

    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user.id
    }

    /// Bearer token for row-level-security scoped requests.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("user", &self.user)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}
