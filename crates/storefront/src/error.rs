//! Unified error handling with Sentry integration.
//!
//! Provides a unified `Error` type for host applications. Internal details
//! stay in `Display`/logs; [`Error::user_message`] is what the user sees.

use thiserror::Error as ThisError;

use crate::config::ConfigError;
use crate::gateway::GatewayError;
use crate::services::auth::AuthError;
use crate::storage::{SnapshotError, StoreError};

/// Application-level error type for the storefront.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote data source call failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Local storage failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Cart snapshot could not be written.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl Error {
    /// Message safe to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(err) => format!("Configuración inválida: {err}"),
            Self::Gateway(err) => match err {
                GatewayError::RateLimited(secs) => {
                    format!("Demasiadas solicitudes, intenta de nuevo en {secs} segundos")
                }
                GatewayError::Unauthorized(_) => {
                    "Tu sesión expiró, inicia sesión de nuevo".to_string()
                }
                _ => "Error al conectar con la tienda".to_string(),
            },
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => "Correo electrónico inválido".to_string(),
                AuthError::InvalidCredentials => "Correo o contraseña incorrectos".to_string(),
                AuthError::UserAlreadyExists => {
                    "Ya existe una cuenta con este correo".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::ConfirmationRequired => {
                    "Revisa tu correo para confirmar tu cuenta".to_string()
                }
                AuthError::NotSignedIn => "No has iniciado sesión".to_string(),
                _ => "Error de autenticación".to_string(),
            },
            Self::Store(_) | Self::Snapshot(_) => "Error al guardar los datos locales".to_string(),
            Self::NotFound(what) => format!("No encontrado: {what}"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    /// Whether this error should reach error tracking.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Store(_) | Self::Snapshot(_) => true,
            Self::Gateway(err) => !matches!(
                err,
                GatewayError::RateLimited(_) | GatewayError::Unauthorized(_)
            ),
            Self::Auth(err) => matches!(
                err,
                AuthError::Gateway(_) | AuthError::Store(_) | AuthError::Session(_)
            ),
            Self::Config(_) | Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }

    /// Capture to Sentry when internal, then log.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command failed"
            );
        } else {
            tracing::debug!(error = %self, "Command rejected");
        }
    }
}

/// Result type alias for `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
