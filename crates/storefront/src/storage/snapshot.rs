//! Cart snapshot persistence.

use std::sync::Arc;

use thiserror::Error;

use vitrina_core::Cart;

use super::{KeyValueStore, StoreError};
use crate::models::keys;

/// Errors writing a cart snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reads and writes the cart snapshot in the `cart` slot.
#[derive(Clone)]
pub struct CartSnapshotStore {
    store: Arc<dyn KeyValueStore>,
}

impl CartSnapshotStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the last saved cart.
    ///
    /// Never fails: a missing slot yields an empty cart silently, and an
    /// unreadable, unparsable or malformed snapshot yields an empty cart with
    /// a warning.
    #[must_use]
    pub fn load(&self) -> Cart {
        let raw = match self.store.get(keys::CART) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart snapshot, starting empty");
                return Cart::new();
            }
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(cart) if cart.is_well_formed() => {
                tracing::debug!(lines = cart.len(), "Loaded cart snapshot");
                cart
            }
            Ok(cart) => {
                tracing::warn!(
                    lines = cart.len(),
                    "Cart snapshot violates cart invariants, starting empty"
                );
                Cart::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cart snapshot is not valid, starting empty");
                Cart::new()
            }
        }
    }

    /// Overwrite the snapshot with `cart`.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the cart cannot be serialized or written.
    pub fn save(&self, cart: &Cart) -> Result<(), SnapshotError> {
        let raw = serde_json::to_string(cart)?;
        self.store.set(keys::CART, &raw)?;
        Ok(())
    }
}
