//! Product catalog.
//!
//! The product list is read-only for the client and changes rarely, so it is
//! fetched once and cached for a configurable TTL (5 minutes by default).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use vitrina_core::{Category, Product, ProductId};

use crate::gateway::{GatewayError, ProductGateway};

/// Number of products shown on the home page.
pub const FEATURED_LIMIT: usize = 3;

/// Cache key for the full product list.
const ALL_PRODUCTS_KEY: &str = "products";

/// Cached, read-only view over the product gateway.
#[derive(Clone)]
pub struct Catalog {
    gateway: Arc<dyn ProductGateway>,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl Catalog {
    #[must_use]
    pub fn new(gateway: Arc<dyn ProductGateway>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(16).time_to_live(ttl).build();
        Self { gateway, cache }
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is not cached and the gateway call fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, GatewayError> {
        if let Some(products) = self.cache.get(ALL_PRODUCTS_KEY).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut products = self.gateway.list_products().await?;
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let products = Arc::new(products);
        debug!(count = products.len(), "Fetched products");

        self.cache
            .insert(ALL_PRODUCTS_KEY, Arc::clone(&products))
            .await;
        Ok(products)
    }

    /// Products in `category`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be fetched.
    pub async fn by_category(&self, category: Category) -> Result<Vec<Product>, GatewayError> {
        Ok(self
            .products()
            .await?
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }

    /// Up to [`FEATURED_LIMIT`] featured products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be fetched.
    pub async fn featured(&self) -> Result<Vec<Product>, GatewayError> {
        Ok(self
            .products()
            .await?
            .iter()
            .filter(|p| p.featured)
            .take(FEATURED_LIMIT)
            .cloned()
            .collect())
    }

    /// A single product, or `None` if no product has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be fetched.
    pub async fn get(&self, product_id: &ProductId) -> Result<Option<Product>, GatewayError> {
        Ok(self
            .products()
            .await?
            .iter()
            .find(|p| &p.id == product_id)
            .cloned())
    }

    /// Drop cached data so the next read hits the gateway.
    pub async fn invalidate(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}
