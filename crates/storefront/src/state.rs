//! Application state shared by the host.

use std::sync::Arc;

use vitrina_core::{Product, ProductId};

use crate::checkout;
use crate::config::StorefrontConfig;
use crate::error::{Error, Result};
use crate::gateway::{AuthGateway, FavoritesGateway, ProductGateway};
use crate::models::Identity;
use crate::services::notify::Notifier;
use crate::services::{AuthService, CartManager, Catalog, FavoritesManager};
use crate::storage::{CartSnapshotStore, FileStore, KeyValueStore};
use crate::supabase::SupabaseClient;

/// Remote collaborators behind their gateway traits.
#[derive(Clone)]
pub struct Gateways {
    pub products: Arc<dyn ProductGateway>,
    pub favorites: Arc<dyn FavoritesGateway>,
    pub auth: Arc<dyn AuthGateway>,
}

impl Gateways {
    /// All three gateways backed by one Supabase client.
    #[must_use]
    pub fn supabase(client: SupabaseClient) -> Self {
        let client = Arc::new(client);
        Self {
            products: client.clone(),
            favorites: client.clone(),
            auth: client,
        }
    }
}

/// Application state.
///
/// This struct is cheaply cloneable via `Arc` and wires the managers to a
/// single store, notifier and set of gateways.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: CartManager,
    favorites: FavoritesManager,
    catalog: Catalog,
    auth: AuthService,
}

impl AppState {
    /// Open the data directory and connect to the configured Supabase project.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new(config: StorefrontConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let store = Arc::new(FileStore::open(&config.data_dir)?);
        let gateways = Gateways::supabase(SupabaseClient::new(&config.supabase));
        Ok(Self::with_parts(config, store, gateways, notifier))
    }

    /// Assemble state from explicit parts.
    #[must_use]
    pub fn with_parts(
        config: StorefrontConfig,
        store: Arc<dyn KeyValueStore>,
        gateways: Gateways,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let cart = CartManager::load(
            CartSnapshotStore::new(store.clone()),
            notifier.clone(),
            config.checkout.greeting.clone(),
        );
        let favorites = FavoritesManager::new(gateways.favorites, notifier);
        let catalog = Catalog::new(gateways.products, config.catalog_ttl);
        let auth = AuthService::new(gateways.auth, store);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                cart,
                favorites,
                catalog,
                auth,
            }),
        }
    }

    /// Restore the saved session and load favorites for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session slot cannot be read.
    pub async fn initialize(&self) -> Result<Option<Identity>> {
        let identity = self.inner.auth.restore().await?;
        self.inner.favorites.initialize(identity.clone()).await;
        Ok(identity)
    }

    /// Sign in and switch favorites to the new identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let identity = self.inner.auth.sign_in(email, password).await?;
        self.inner
            .favorites
            .on_identity_changed(Some(identity.clone()))
            .await;
        Ok(identity)
    }

    /// Create an account and switch favorites to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be created or signed in.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<Identity> {
        let identity = self.inner.auth.sign_up(email, password, name).await?;
        self.inner
            .favorites
            .on_identity_changed(Some(identity.clone()))
            .await;
        Ok(identity)
    }

    /// Sign out and clear local favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if nobody is signed in or the session slot cannot be
    /// removed.
    pub async fn sign_out(&self) -> Result<()> {
        let result = self.inner.auth.sign_out().await;
        self.inner.favorites.on_identity_changed(None).await;
        result.map_err(Error::from)
    }

    /// Look up a product, failing with `NotFound` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched or has no such product.
    pub async fn product(&self, product_id: &ProductId) -> Result<Product> {
        self.inner
            .catalog
            .get(product_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("producto {product_id}")))
    }

    /// Deep link for the current cart, or `None` when it is empty.
    #[must_use]
    pub fn checkout_url(&self) -> Option<String> {
        let payload = self.inner.cart.build_checkout_payload();
        checkout::checkout_url(&self.inner.config.checkout.phone, &payload)
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn cart(&self) -> &CartManager {
        &self.inner.cart
    }

    #[must_use]
    pub fn favorites(&self) -> &FavoritesManager {
        &self.inner.favorites
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}
