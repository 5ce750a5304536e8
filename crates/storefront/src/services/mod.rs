//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Email/password sessions against the auth server
//! - `cart` - Local cart state, persisted to the `cart` slot
//! - `catalog` - Cached product listing
//! - `favorites` - Server-backed favorites for the signed-in user
//! - `notify` - User-visible notifications

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod notify;

pub use auth::{AuthError, AuthService};
pub use cart::CartManager;
pub use catalog::Catalog;
pub use favorites::{FavoritesManager, FavoritesState};
pub use notify::{Notification, NotificationLevel, NotificationLog, Notifier};
