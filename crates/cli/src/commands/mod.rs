//! Subcommand handlers.
//!
//! Handlers print results to stdout. Notifications raised while a command
//! runs are printed afterwards by [`print_notifications`].

pub mod auth;
pub mod cart;
pub mod favorites;
pub mod products;

pub use auth::AuthAction;
pub use cart::CartAction;
pub use favorites::FavoritesAction;
pub use products::ProductsAction;

use vitrina_core::Product;
use vitrina_storefront::services::{Notification, NotificationLevel};

/// Print notifications in order. Returns whether any was an error.
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn print_notifications(notifications: &[Notification]) -> bool {
    let mut had_error = false;
    for notification in notifications {
        match notification.level {
            NotificationLevel::Success => println!("✓ {}", notification.message),
            NotificationLevel::Error => {
                had_error = true;
                eprintln!("✗ {}", notification.message);
            }
        }
    }
    had_error
}

/// One-line product summary.
fn product_line(product: &Product) -> String {
    let stock = if product.in_stock() {
        String::new()
    } else {
        " (agotado)".to_string()
    };
    format!(
        "{}  {}  {}  [{}]{stock}",
        product.id, product.name, product.price, product.category
    )
}
