//! `GoTrue` email/password endpoints.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use vitrina_core::{Email, User, UserId};

use super::SupabaseClient;
use crate::gateway::{AuthGateway, GatewayError};
use crate::models::StoredSession;

const TOKEN_PATH: &str = "auth/v1/token";
const SIGNUP_PATH: &str = "auth/v1/signup";
const LOGOUT_PATH: &str = "auth/v1/logout";

// ── Wire types ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Serialize)]
struct SignUpMetadata<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

#[derive(Deserialize)]
struct AuthUser {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    name: Option<String>,
}

impl TokenResponse {
    fn into_session(self) -> Result<StoredSession, GatewayError> {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_else(|| Utc::now() + Duration::seconds(self.expires_in.unwrap_or(3600)));

        let email = self
            .user
            .email
            .ok_or_else(|| GatewayError::InvalidResponse("user has no email".to_string()))?;
        let email = Email::parse(&email)
            .map_err(|e| GatewayError::InvalidResponse(format!("user email: {e}")))?;

        Ok(StoredSession {
            user: User {
                id: self.user.id,
                email,
                name: self.user.user_metadata.name,
                created_at: self.user.created_at,
            },
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
        })
    }
}

// ── Gateway impl ─────────────────────────────────────────────────────

#[async_trait]
impl AuthGateway for SupabaseClient {
    #[instrument(skip(self, password))]
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<StoredSession, GatewayError> {
        let url = self.url(TOKEN_PATH, &[("grant_type", "password")])?;
        let body = PasswordCredentials {
            email: email.as_str(),
            password,
        };
        let resp = self.request(Method::POST, url, None).json(&body).send().await?;
        Self::handle_response::<TokenResponse>(resp)
            .await?
            .into_session()
    }

    #[instrument(skip(self, password))]
    async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        name: Option<&str>,
    ) -> Result<Option<StoredSession>, GatewayError> {
        let url = self.url(SIGNUP_PATH, &[])?;
        let body = SignUpRequest {
            email: email.as_str(),
            password,
            data: SignUpMetadata { name },
        };
        let resp = self.request(Method::POST, url, None).json(&body).send().await?;

        // With email confirmation enabled the response is the bare user
        let value: serde_json::Value = Self::handle_response(resp).await?;
        if value.get("access_token").is_none() {
            return Ok(None);
        }
        serde_json::from_value::<TokenResponse>(value)?
            .into_session()
            .map(Some)
    }

    #[instrument(skip_all)]
    async fn refresh_session(&self, refresh_token: &str) -> Result<StoredSession, GatewayError> {
        let url = self.url(TOKEN_PATH, &[("grant_type", "refresh_token")])?;
        let resp = self
            .request(Method::POST, url, None)
            .json(&RefreshGrant { refresh_token })
            .send()
            .await?;
        Self::handle_response::<TokenResponse>(resp)
            .await?
            .into_session()
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, access_token: &str) -> Result<(), GatewayError> {
        let url = self.url(LOGOUT_PATH, &[])?;
        let resp = self
            .request(Method::POST, url, Some(access_token))
            .send()
            .await?;
        Self::handle_empty(resp).await
    }
}
