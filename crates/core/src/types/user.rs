//! Authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;

/// A storefront user as reported by the auth collaborator.
///
/// The client never manages credentials; it only keeps the identity the
/// auth API hands back after sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name to greet the user with: their display name, or the local part of
    /// their email when they signed up without one.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.email.local_part())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut user = User {
            id: UserId::new("u1"),
            email: Email::parse("maria@tienda.mx").unwrap(),
            name: None,
            created_at: Utc::now(),
        };
        assert_eq!(user.display_name(), "maria");

        user.name = Some("María López".to_owned());
        assert_eq!(user.display_name(), "María López");

        user.name = Some("  ".to_owned());
        assert_eq!(user.display_name(), "maria");
    }
}
