//! Authentication error types.

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::storage::StoreError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] vitrina_core::EmailError),

    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account already exists for this email.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Account created, but it must be confirmed by email before sign-in.
    #[error("email confirmation required")]
    ConfirmationRequired,

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// The auth server rejected the request.
    #[error("auth gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// The session slot could not be read or written.
    #[error("session storage error: {0}")]
    Store(#[from] StoreError),

    /// The session could not be serialized.
    #[error("session encoding error: {0}")]
    Session(#[from] serde_json::Error),
}
