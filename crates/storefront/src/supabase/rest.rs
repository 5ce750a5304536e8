//! `PostgREST` tables: products and favorites.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use vitrina_core::{Favorite, Product, ProductId, UserId};

use super::SupabaseClient;
use crate::gateway::{FavoritesGateway, GatewayError, ProductGateway};
use crate::models::Identity;

const PRODUCTS_PATH: &str = "rest/v1/products";
const FAVORITES_PATH: &str = "rest/v1/favorites";

/// Favorite columns plus the embedded product row.
const FAVORITES_SELECT: &str = "id,user_id,product_id,created_at,product:products(*)";

#[derive(Debug, Serialize)]
struct NewFavorite<'a> {
    user_id: &'a UserId,
    product_id: &'a ProductId,
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl ProductGateway for SupabaseClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, GatewayError> {
        let url = self.url(
            PRODUCTS_PATH,
            &[("select", "*"), ("order", "created_at.desc")],
        )?;
        let resp = self.request(Method::GET, url, None).send().await?;
        Self::handle_response(resp).await
    }
}

#[async_trait]
impl FavoritesGateway for SupabaseClient {
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id()))]
    async fn list_favorites(&self, identity: &Identity) -> Result<Vec<Favorite>, GatewayError> {
        let user_filter = eq(identity.user_id().as_str());
        let url = self.url(
            FAVORITES_PATH,
            &[("select", FAVORITES_SELECT), ("user_id", user_filter.as_str())],
        )?;
        let resp = self
            .request(Method::GET, url, Some(identity.access_token()))
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.user_id()))]
    async fn insert_favorite(
        &self,
        identity: &Identity,
        product_id: &ProductId,
    ) -> Result<(), GatewayError> {
        let url = self.url(FAVORITES_PATH, &[])?;
        let body = NewFavorite {
            user_id: identity.user_id(),
            product_id,
        };
        let resp = self
            .request(Method::POST, url, Some(identity.access_token()))
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await?;
        Self::handle_empty(resp).await
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.user_id()))]
    async fn delete_favorite(
        &self,
        identity: &Identity,
        product_id: &ProductId,
    ) -> Result<(), GatewayError> {
        let user_filter = eq(identity.user_id().as_str());
        let product_filter = eq(product_id.as_str());
        let url = self.url(
            FAVORITES_PATH,
            &[("user_id", user_filter.as_str()), ("product_id", product_filter.as_str())],
        )?;
        let resp = self
            .request(Method::DELETE, url, Some(identity.access_token()))
            .send()
            .await?;
        Self::handle_empty(resp).await
    }
}
