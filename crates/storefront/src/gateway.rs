//! Remote data source seams.
//!
//! The state managers talk to the backend only through these traits. The
//! production implementation is [`crate::supabase::SupabaseClient`]; tests
//! substitute in-memory gateways that count their calls.

use async_trait::async_trait;
use thiserror::Error;

use vitrina_core::{Email, Favorite, Product, ProductId};

use crate::models::{Identity, StoredSession};

/// Errors returned by remote gateway calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The row already exists (unique constraint violation).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The access token was missing, expired or rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by the remote API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed but is missing data the client needs.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A request URL could not be built from the configured base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Read access to the product catalog.
#[async_trait]
pub trait ProductGateway: Send + Sync {
    /// All products, newest first.
    async fn list_products(&self) -> Result<Vec<Product>, GatewayError>;
}

/// Favorites CRUD scoped by the authenticated user.
#[async_trait]
pub trait FavoritesGateway: Send + Sync {
    /// Every favorite owned by `identity`, with products embedded.
    async fn list_favorites(&self, identity: &Identity) -> Result<Vec<Favorite>, GatewayError>;

    /// Insert a favorite keyed by `(identity.user_id, product_id)`.
    async fn insert_favorite(
        &self,
        identity: &Identity,
        product_id: &ProductId,
    ) -> Result<(), GatewayError>;

    /// Delete every favorite matching `(identity.user_id, product_id)`.
    async fn delete_favorite(
        &self,
        identity: &Identity,
        product_id: &ProductId,
    ) -> Result<(), GatewayError>;
}

/// Email and password accounts.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<StoredSession, GatewayError>;

    /// Create an account.
    ///
    /// Returns `None` when the project requires email confirmation before
    /// the first sign-in.
    async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        name: Option<&str>,
    ) -> Result<Option<StoredSession>, GatewayError>;

    /// Trade a refresh token for a fresh session.
    async fn refresh_session(&self, refresh_token: &str) -> Result<StoredSession, GatewayError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), GatewayError>;
}
