//! Authentication service.
//!
//! Email and password accounts backed by the remote auth server. The signed
//! in session is kept in the `session` slot so the next process can pick it
//! up with [`AuthService::restore`].

mod error;

pub use error::AuthError;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::instrument;

use vitrina_core::Email;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::gateway::{AuthGateway, GatewayError};
use crate::models::{Identity, StoredSession, keys};
use crate::storage::KeyValueStore;

/// Minimum password length accepted by the auth server.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Authentication service.
///
/// Handles sign-in, sign-up, sign-out and session restore.
pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
    store: Arc<dyn KeyValueStore>,
    session: watch::Sender<Option<StoredSession>>,
}

impl AuthService {
    /// Create a signed-out service. Call [`Self::restore`] to resume a session.
    #[must_use]
    pub fn new(gateway: Arc<dyn AuthGateway>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            gateway,
            store,
            session: watch::Sender::new(None),
        }
    }

    /// The signed-in identity, if any.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.session.borrow().as_ref().map(StoredSession::identity)
    }

    /// Observe sign-in and sign-out.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<StoredSession>> {
        self.session.subscribe()
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self
            .gateway
            .sign_in_with_password(&email, password)
            .await
            .map_err(|e| match e {
                GatewayError::Unauthorized(_) | GatewayError::Api { status: 400, .. } => {
                    AuthError::InvalidCredentials
                }
                other => AuthError::Gateway(other),
            })?;

        tracing::info!(user_id = %session.user.id, "User signed in");
        self.establish(session)
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    /// Returns `AuthError::ConfirmationRequired` if the account was created
    /// but must be confirmed before the first sign-in.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<Identity, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        let session = self
            .gateway
            .sign_up(&email, password, name)
            .await
            .map_err(|e| match e {
                GatewayError::Conflict(_) => AuthError::UserAlreadyExists,
                GatewayError::Api {
                    status: 400 | 422,
                    message,
                } if message.to_lowercase().contains("already registered") => {
                    AuthError::UserAlreadyExists
                }
                GatewayError::Api {
                    status: 422,
                    message,
                } => AuthError::WeakPassword(message),
                other => AuthError::Gateway(other),
            })?;

        let Some(session) = session else {
            tracing::info!("Account created, awaiting email confirmation");
            return Err(AuthError::ConfirmationRequired);
        };

        tracing::info!(user_id = %session.user.id, "User signed up");
        self.establish(session)
    }

    /// Sign out.
    ///
    /// The local session is removed even when the remote logout fails.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` if there is no session.
    /// Returns `AuthError::Store` if the session slot cannot be removed.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.session.send_replace(None) else {
            return Err(AuthError::NotSignedIn);
        };

        if let Err(e) = self.gateway.sign_out(&session.access_token).await {
            tracing::warn!(error = %e, "Remote sign-out failed, discarding local session anyway");
        }

        clear_sentry_user();
        self.store.remove(keys::SESSION)?;
        tracing::info!(user_id = %session.user.id, "User signed out");
        Ok(())
    }

    /// Resume the session saved by a previous process.
    ///
    /// An expired access token is refreshed once; if that fails the saved
    /// session is discarded and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the session slot cannot be read.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<Option<Identity>, AuthError> {
        let Some(raw) = self.store.get(keys::SESSION)? else {
            return Ok(None);
        };

        let saved = match serde_json::from_str::<StoredSession>(&raw) {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(error = %e, "Saved session is not valid, discarding");
                self.discard_saved();
                return Ok(None);
            }
        };

        if !saved.is_expired(Utc::now()) {
            tracing::debug!(user_id = %saved.user.id, "Restored saved session");
            return self.establish(saved).map(Some);
        }

        match self.gateway.refresh_session(&saved.refresh_token).await {
            Ok(refreshed) => {
                tracing::debug!(user_id = %refreshed.user.id, "Refreshed expired session");
                self.establish(refreshed).map(Some)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session refresh failed, discarding saved session");
                self.discard_saved();
                Ok(None)
            }
        }
    }

    /// Persist `session` and make it current.
    fn establish(&self, session: StoredSession) -> Result<Identity, AuthError> {
        let raw = serde_json::to_string(&session)?;
        self.store.set(keys::SESSION, &raw)?;

        let identity = session.identity();
        set_sentry_user(identity.user_id(), Some(identity.user().email.as_str()));
        self.session.send_replace(Some(session));
        Ok(identity)
    }

    fn discard_saved(&self) {
        if let Err(e) = self.store.remove(keys::SESSION) {
            tracing::error!(error = %e, "Failed to remove saved session");
        }
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}
