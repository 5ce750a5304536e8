//! Supabase REST and auth client.
//!
//! # Architecture
//!
//! - `PostgREST` (`/rest/v1`) for products and favorites
//! - `GoTrue` (`/auth/v1`) for email/password sessions
//! - Every request carries the project's anon key as `apikey`; the bearer
//!   token is the user's access token when one is available, so row level
//!   security scopes favorites to their owner
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrina_storefront::supabase::SupabaseClient;
//!
//! let client = SupabaseClient::new(&config.supabase);
//! let products = client.list_products().await?;
//! ```

mod auth;
mod rest;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::SupabaseConfig;
use crate::gateway::GatewayError;

// =============================================================================
// SupabaseClient
// =============================================================================

/// Client for a Supabase project.
///
/// Implements [`ProductGateway`](crate::gateway::ProductGateway),
/// [`FavoritesGateway`](crate::gateway::FavoritesGateway) and
/// [`AuthGateway`](crate::gateway::AuthGateway).
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    http: reqwest::Client,
    base_url: Url,
    anon_key: SecretString,
}

impl SupabaseClient {
    /// Create a client for the configured project.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self::with_client(
            reqwest::Client::new(),
            config.url.clone(),
            config.anon_key.clone(),
        )
    }

    /// Create a client with a caller-supplied HTTP client.
    #[must_use]
    pub fn with_client(http: reqwest::Client, mut base_url: Url, anon_key: SecretString) -> Self {
        // Joined paths are relative, so the base must end with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            inner: Arc::new(SupabaseClientInner {
                http,
                base_url,
                anon_key,
            }),
        }
    }

    // ── Request building ─────────────────────────────────────────────

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, GatewayError> {
        let mut url = self.inner.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Start a request with the project headers.
    ///
    /// Without an access token the anon key doubles as the bearer token.
    fn request(&self, method: Method, url: Url, access_token: Option<&str>) -> RequestBuilder {
        debug!("{method} {}", url.path());
        let anon_key = self.inner.anon_key.expose_secret();
        self.inner
            .http
            .request(method, url)
            .header("apikey", anon_key)
            .bearer_auth(access_token.unwrap_or(anon_key))
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: Response) -> Result<T, GatewayError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse Supabase response"
            );
            GatewayError::Parse(e)
        })
    }

    async fn handle_empty(resp: Response) -> Result<(), GatewayError> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: StatusCode, resp: Response) -> GatewayError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return GatewayError::RateLimited(retry_after);
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.chars().take(200).collect()
                }
            });

        tracing::warn!(status = %status, message = %message, "Supabase returned non-success status");

        match status {
            StatusCode::CONFLICT => GatewayError::Conflict(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(message),
            _ => GatewayError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Error body shapes used by `PostgREST` and `GoTrue`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}
