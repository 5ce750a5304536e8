//! User-scoped product bookmarks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{FavoriteId, ProductId, UserId};
use super::product::Product;

/// A favorite as returned by the remote data source, with the referenced
/// product embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// Server-assigned id.
    pub id: FavoriteId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub product: Product,
    pub created_at: DateTime<Utc>,
}
