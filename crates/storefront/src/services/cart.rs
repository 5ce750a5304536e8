//! Cart state manager.
//!
//! Owns the in-memory cart for the session. Every mutation is applied,
//! persisted to the `cart` slot and published to subscribers before the
//! call returns. Persistence is best-effort: a failed write is logged and
//! never undoes the in-memory change.

use std::num::NonZeroU32;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::instrument;

use vitrina_core::{Cart, CartLine, Price, Product, ProductId};

use crate::checkout;
use crate::error::add_breadcrumb;
use crate::services::notify::{Notification, Notifier};
use crate::storage::CartSnapshotStore;

/// Owns the cart and synchronizes it to local storage.
pub struct CartManager {
    snapshots: CartSnapshotStore,
    notifier: Arc<dyn Notifier>,
    greeting: String,
    cart: watch::Sender<Cart>,
}

impl CartManager {
    /// Hydrate the cart from the last saved snapshot.
    #[must_use]
    pub fn load(
        snapshots: CartSnapshotStore,
        notifier: Arc<dyn Notifier>,
        greeting: impl Into<String>,
    ) -> Self {
        let cart = snapshots.load();
        tracing::info!(
            lines = cart.len(),
            items = cart.total_item_count(),
            "Cart hydrated"
        );

        Self {
            snapshots,
            notifier,
            greeting: greeting.into(),
            cart: watch::Sender::new(cart),
        }
    }

    /// Add `quantity` units of `product`.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&self, product: &Product, quantity: NonZeroU32) {
        self.mutate(|cart| {
            cart.add(product, quantity);
            true
        });
        add_breadcrumb(
            "cart",
            "Added item",
            Some(&[("product_id", product.id.as_str())]),
        );
        self.notifier
            .notify(Notification::success("Producto agregado al carrito"));
    }

    /// Remove the line for `product_id`, if any.
    #[instrument(skip(self))]
    pub fn remove_item(&self, product_id: &ProductId) {
        self.mutate(|cart| cart.remove(product_id));
        add_breadcrumb(
            "cart",
            "Removed item",
            Some(&[("product_id", product_id.as_str())]),
        );
        self.notifier
            .notify(Notification::success("Producto eliminado del carrito"));
    }

    /// Replace the quantity of a line. Zero or less removes it.
    #[instrument(skip(self))]
    pub fn update_quantity(&self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        self.mutate(|cart| cart.set_quantity(product_id, quantity));
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear(&self) {
        self.mutate(|cart| {
            cart.clear();
            true
        });
        add_breadcrumb("cart", "Cleared cart", None);
        self.notifier.notify(Notification::success("Carrito vaciado"));
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.cart.borrow().total_price()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.cart.borrow().total_item_count()
    }

    /// Percent-encoded checkout message, or `""` for an empty cart.
    #[must_use]
    pub fn build_checkout_payload(&self) -> String {
        checkout::checkout_payload(&self.cart.borrow(), &self.greeting)
    }

    /// Copy of the current lines, in add order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.cart.borrow().lines().to_vec()
    }

    /// Copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.cart.borrow().clone()
    }

    /// Observe every change to the cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.cart.subscribe()
    }

    /// Apply `f`, persist, and publish.
    ///
    /// The snapshot is written on every call, changed or not, so the slot
    /// always mirrors the in-memory cart after a mutation.
    fn mutate(&self, f: impl FnOnce(&mut Cart) -> bool) {
        let mut changed = false;
        self.cart.send_if_modified(|cart| {
            changed = f(cart);
            changed
        });

        if let Err(e) = self.snapshots.save(&self.cart.borrow()) {
            tracing::error!(error = %e, changed, "Failed to persist cart snapshot");
        }
    }
}
