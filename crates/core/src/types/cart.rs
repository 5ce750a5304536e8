//! Client-side shopping cart.
//!
//! The cart is a plain ordered list of lines. Lines keep the order in which
//! products were first added, and there is at most one line per product id.
//! All operations here are pure; persistence and notifications are layered
//! on top by the storefront's cart manager.

use std::collections::HashSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// One product-and-quantity entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Same as `product.id`.
    pub id: ProductId,
    /// Snapshot of the product at the time it was added.
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// An ordered collection of cart lines.
///
/// Serializes as a bare JSON array of lines, which is the snapshot format
/// kept in local storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in add order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add `quantity` units of `product`.
    ///
    /// Increments the existing line if there is one, otherwise appends a new
    /// line at the end. No stock check is done here.
    pub fn add(&mut self, product: &Product, quantity: NonZeroU32) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity.get());
            return;
        }

        self.lines.push(CartLine {
            id: product.id.clone(),
            product: product.clone(),
            quantity: quantity.get(),
        });
    }

    /// Remove the line for a product. Returns `true` if a line was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.id != product_id);
        self.lines.len() != before
    }

    /// Set the quantity of a line.
    ///
    /// A quantity of zero or less removes the line. Quantities above
    /// `u32::MAX` saturate. Returns `true` if the cart changed.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(product_id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        match self.lines.iter_mut().find(|line| &line.id == product_id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Check the structural invariants a well-formed cart upholds.
    ///
    /// Every line has a positive quantity, its id matches its product, and
    /// no product id appears twice.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.lines.len());
        self.lines
            .iter()
            .all(|line| line.quantity > 0 && line.id == line.product.id && seen.insert(&line.id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::product::Category;

    fn product(id: &str, name: &str, cents: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: String::new(),
            price: Price::from_cents(cents),
            image: String::new(),
            category: Category::Clothing,
            stock: 10,
            featured: false,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn qty(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_repeated_add_merges_into_one_line() {
        let camisa = product("p1", "Camisa", 1999);
        let mut cart = Cart::new();

        cart.add(&camisa, qty(1));
        cart.add(&camisa, qty(3));
        cart.add(&camisa, qty(2));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(&camisa.id).unwrap().quantity, 6);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&product("b", "Botas", 5000), qty(1));
        cart.add(&product("a", "Aretes", 1500), qty(1));
        cart.add(&product("b", "Botas", 5000), qty(1));

        let ids: Vec<_> = cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        let camisa = product("p1", "Camisa", 1999);
        cart.add(&camisa, qty(1));

        assert!(cart.remove(&camisa.id));
        let after_first = cart.clone();
        assert!(!cart.remove(&camisa.id));
        assert_eq!(cart, after_first);
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let camisa = product("p1", "Camisa", 1999);

        for quantity in [0, -1, i64::MIN] {
            let mut cart = Cart::new();
            cart.add(&camisa, qty(2));
            assert!(cart.set_quantity(&camisa.id, quantity));
            assert!(cart.is_empty());
        }
    }

    #[test]
    fn test_set_quantity_replaces_without_clamping() {
        let camisa = product("p1", "Camisa", 1999);
        let mut cart = Cart::new();
        cart.add(&camisa, qty(2));

        assert!(cart.set_quantity(&camisa.id, 50));
        assert_eq!(cart.line(&camisa.id).unwrap().quantity, 50);
        assert!(!cart.set_quantity(&ProductId::new("missing"), 3));
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        assert_eq!(cart.total_price(), Price::ZERO);
        assert_eq!(cart.total_item_count(), 0);

        cart.add(&product("p1", "Camisa", 1999), qty(2));
        cart.add(&product("p2", "Tenis", 4550), qty(1));

        assert_eq!(cart.total_price(), Price::from_cents(1999 * 2 + 4550));
        assert_eq!(cart.total_item_count(), 3);
    }

    #[test]
    fn test_snapshot_is_bare_array() {
        let mut cart = Cart::new();
        cart.add(&product("p1", "Camisa", 1999), qty(2));

        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], "p1");
        assert_eq!(json[0]["quantity"], 2);
        assert_eq!(json[0]["product"]["name"], "Camisa");
    }

    #[test]
    fn test_well_formed_detects_duplicates_and_zero_quantity() {
        let camisa = product("p1", "Camisa", 1999);
        let line = CartLine {
            id: camisa.id.clone(),
            product: camisa,
            quantity: 1,
        };

        let duplicated = Cart {
            lines: vec![line.clone(), line.clone()],
        };
        assert!(!duplicated.is_well_formed());

        let zero = Cart {
            lines: vec![CartLine { quantity: 0, ..line.clone() }],
        };
        assert!(!zero.is_well_formed());

        assert!(Cart { lines: vec![line] }.is_well_formed());
    }
}
