//! Customer email addresses.
//!
//! An address is checked twice: when the customer types it into sign-in or
//! sign-up, before any request is made, and when the auth API returns the
//! user. The saved session slot goes through the same check on load.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why an address was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email is required")]
    Empty,
    #[error("email is longer than {max} characters", max = Email::MAX_LENGTH)]
    TooLong,
    #[error("'{0}' is not an email address")]
    Malformed(String),
}

/// A normalized (trimmed, lowercase) customer email.
///
/// ```
/// use vitrina_core::Email;
///
/// let email = Email::parse(" Maria@Tienda.MX ").unwrap();
/// assert_eq!(email.as_str(), "maria@tienda.mx");
/// assert_eq!(email.local_part(), "maria");
///
/// assert!(Email::parse("maria@tienda").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Longest address the auth API stores.
    pub const MAX_LENGTH: usize = 254;

    /// Normalize and check an address as typed by the customer.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] when the input is blank, too long, or is not
    /// `local@domain.tld` with no spaces.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let email = input.trim().to_lowercase();
        if email.is_empty() {
            return Err(EmailError::Empty);
        }
        if email.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong);
        }
        if !is_well_formed(&email) {
            return Err(EmailError::Malformed(email));
        }
        Ok(Self(email))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the `@`. Greets customers who never set a name.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0
            .split_once('@')
            .map_or(self.0.as_str(), |(local, _)| local)
    }
}

fn is_well_formed(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_form_input_is_normalized() {
        let email = Email::parse("  Cliente@Tienda.MX \n").unwrap();
        assert_eq!(email.as_str(), "cliente@tienda.mx");
        assert_eq!(email.to_string(), "cliente@tienda.mx");
    }

    #[test]
    fn test_rejects_typos_before_any_request() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        for typo in [
            "maria",
            "maria@",
            "@tienda.mx",
            "maria@tienda",
            "maria@tienda.",
            "maria@@tienda.mx",
            "maria lopez@tienda.mx",
        ] {
            assert!(
                matches!(Email::parse(typo), Err(EmailError::Malformed(_))),
                "accepted {typo:?}"
            );
        }
    }

    #[test]
    fn test_rejects_overlong_address() {
        let long = format!("{}@tienda.mx", "a".repeat(Email::MAX_LENGTH));
        assert_eq!(Email::parse(&long), Err(EmailError::TooLong));
    }

    #[test]
    fn test_plus_addressing_is_allowed() {
        let email = Email::parse("maria+ofertas@correo.tienda.mx").unwrap();
        assert_eq!(email.local_part(), "maria+ofertas");
    }

    #[test]
    fn test_session_slot_address_is_checked_on_load() {
        let email: Email = serde_json::from_str("\"Maria@Tienda.mx\"").unwrap();
        assert_eq!(email, Email::parse("maria@tienda.mx").unwrap());
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"maria@tienda.mx\"");

        assert!(serde_json::from_str::<Email>("\"no-es-correo\"").is_err());
    }
}
