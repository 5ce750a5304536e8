//! Favorites state manager.
//!
//! Favorites are server truth. Every mutation round-trips through the
//! gateway and is followed by a full refresh; the local list is never
//! patched optimistically.
//!
//! # Concurrency
//!
//! Gateway round trips are serialized by an async mutex, so an `add` and a
//! `remove` issued back to back cannot interleave their refreshes. A refresh
//! that completes after the identity changed (sign-out or a different user)
//! is discarded instead of repopulating the list.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::instrument;

use vitrina_core::{Favorite, ProductId, UserId};

use crate::error::add_breadcrumb;
use crate::gateway::{FavoritesGateway, GatewayError};
use crate::models::Identity;
use crate::services::notify::{Notification, Notifier};

/// Observable favorites state.
#[derive(Debug, Clone, Default)]
pub struct FavoritesState {
    pub favorites: Arc<Vec<Favorite>>,
    /// True while a remote call is in flight.
    pub loading: bool,
}

impl FavoritesState {
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.favorites.iter().any(|fav| &fav.product_id == product_id)
    }
}

/// Owns the favorites list for the current identity.
pub struct FavoritesManager {
    gateway: Arc<dyn FavoritesGateway>,
    notifier: Arc<dyn Notifier>,
    identity: watch::Sender<Option<Identity>>,
    state: watch::Sender<FavoritesState>,
    round_trips: Mutex<()>,
}

impl FavoritesManager {
    /// Create a manager with no identity and an empty list.
    #[must_use]
    pub fn new(gateway: Arc<dyn FavoritesGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            identity: watch::Sender::new(None),
            state: watch::Sender::new(FavoritesState::default()),
            round_trips: Mutex::new(()),
        }
    }

    /// Set the startup identity. Same contract as [`Self::on_identity_changed`].
    pub async fn initialize(&self, identity: Option<Identity>) {
        self.on_identity_changed(identity).await;
    }

    /// React to sign-in, sign-out or a user switch.
    ///
    /// With an identity, runs one full refresh. Without one, clears the local
    /// list immediately; remote favorites are untouched.
    #[instrument(skip_all, fields(user_id = identity.as_ref().map(|i| i.user_id().as_str())))]
    pub async fn on_identity_changed(&self, identity: Option<Identity>) {
        let incoming = identity.as_ref().map(|i| i.user_id().clone());
        let previous = self.identity.send_replace(identity);

        if incoming.is_none() {
            tracing::debug!("Identity cleared, discarding local favorites");
            self.state.send_replace(FavoritesState::default());
            return;
        }

        // A different user must never see the previous list, even if their
        // own refresh fails.
        if previous.as_ref().map(Identity::user_id) != incoming.as_ref() {
            self.state.send_replace(FavoritesState::default());
        }
        self.refresh().await;
    }

    /// Replace the local list with the server's.
    ///
    /// Without an identity this is a no-op.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let _guard = self.round_trips.lock().await;
        self.refresh_locked().await;
    }

    /// Favorite a product for the current user.
    #[instrument(skip(self))]
    pub async fn add(&self, product_id: &ProductId) {
        let Some(identity) = self.require_identity("Debes iniciar sesión para agregar favoritos")
        else {
            return;
        };

        let _guard = self.round_trips.lock().await;
        self.set_loading(true);
        let result = self.gateway.insert_favorite(&identity, product_id).await;

        match result {
            Ok(()) => {
                self.refresh_locked().await;
                add_breadcrumb(
                    "favorites",
                    "Added favorite",
                    Some(&[("product_id", product_id.as_str())]),
                );
                self.notifier
                    .notify(Notification::success("Producto agregado a favoritos"));
            }
            Err(e) => {
                self.set_loading(false);
                tracing::error!(error = %e, "Failed to add favorite");
                let message = match e {
                    GatewayError::Conflict(_) => "El producto ya está en tus favoritos",
                    _ => "Error al agregar a favoritos",
                };
                self.notifier.notify(Notification::error(message));
            }
        }
    }

    /// Unfavorite a product for the current user.
    #[instrument(skip(self))]
    pub async fn remove(&self, product_id: &ProductId) {
        let Some(identity) = self.require_identity("Debes iniciar sesión para eliminar favoritos")
        else {
            return;
        };

        let _guard = self.round_trips.lock().await;
        self.set_loading(true);
        let result = self.gateway.delete_favorite(&identity, product_id).await;

        match result {
            Ok(()) => {
                self.refresh_locked().await;
                add_breadcrumb(
                    "favorites",
                    "Removed favorite",
                    Some(&[("product_id", product_id.as_str())]),
                );
                self.notifier
                    .notify(Notification::success("Producto eliminado de favoritos"));
            }
            Err(e) => {
                self.set_loading(false);
                tracing::error!(error = %e, "Failed to remove favorite");
                self.notifier
                    .notify(Notification::error("Error al eliminar de favoritos"));
            }
        }
    }

    /// Whether `product_id` is in the current local list.
    #[must_use]
    pub fn is_favorite(&self, product_id: &ProductId) -> bool {
        self.state.borrow().contains(product_id)
    }

    /// The current local list.
    #[must_use]
    pub fn favorites(&self) -> Arc<Vec<Favorite>> {
        Arc::clone(&self.state.borrow().favorites)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// The identity favorites are currently scoped to.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    /// Observe every change to the list or the loading flag.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FavoritesState> {
        self.state.subscribe()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn require_identity(&self, message: &str) -> Option<Identity> {
        let identity = self.identity();
        if identity.is_none() {
            self.notifier.notify(Notification::error(message));
        }
        identity
    }

    fn current_user_id(&self) -> Option<UserId> {
        self.identity.borrow().as_ref().map(|i| i.user_id().clone())
    }

    fn set_loading(&self, loading: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.loading != loading;
            state.loading = loading;
            changed
        });
    }

    /// Full fetch and replace. Caller holds `round_trips`.
    async fn refresh_locked(&self) {
        let Some(identity) = self.identity() else {
            tracing::debug!("No identity, skipping favorites refresh");
            self.set_loading(false);
            return;
        };

        self.set_loading(true);
        let result = self.gateway.list_favorites(&identity).await;

        if self.current_user_id().as_ref() != Some(identity.user_id()) {
            tracing::debug!("Identity changed during refresh, discarding response");
            self.set_loading(false);
            return;
        }

        match result {
            Ok(favorites) => {
                tracing::debug!(count = favorites.len(), "Favorites refreshed");
                self.state.send_replace(FavoritesState {
                    favorites: Arc::new(favorites),
                    loading: false,
                });
            }
            Err(e) => {
                self.set_loading(false);
                tracing::error!(error = %e, "Failed to fetch favorites");
                self.notifier
                    .notify(Notification::error("Error al cargar favoritos"));
            }
        }
    }
}
