//! Auth session persisted in local storage.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use vitrina_core::User;

use super::Identity;

/// Session as written to the `session` slot.
///
/// Tokens are stored in plain text, the same trust level as the browser
/// local storage it replaces. Never log this type; convert it into an
/// [`Identity`] as soon as it is read.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredSession {
    /// Whether the access token has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// The identity this session grants.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(
            self.user.clone(),
            SecretString::from(self.access_token.clone()),
        )
    }
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSession")
            .field("user", &self.user)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Local storage slot keys.
pub mod keys {
    /// Key for the cart snapshot.
    pub const CART: &str = "cart";

    /// Key for the signed-in auth session.
    pub const SESSION: &str = "session";
}
