//! Cart commands.
//!
//! The cart lives in the data directory, so it survives between runs and
//! needs no session.

use std::num::NonZeroU32;

use clap::Subcommand;

use vitrina_core::{Product, ProductId};
use vitrina_storefront::error::{Error, Result};
use vitrina_storefront::state::AppState;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart contents and totals
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: ProductId,

        /// Units to add
        #[arg(short, long, default_value = "1")]
        quantity: NonZeroU32,
    },
    /// Remove a product
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Set the quantity of a product (0 or less removes it)
    Update {
        /// Product ID
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Print the WhatsApp checkout link
    Checkout,
}

#[allow(clippy::print_stdout)]
pub async fn run(state: &AppState, action: CartAction) -> Result<()> {
    let cart = state.cart();
    match action {
        CartAction::Show => {
            let lines = cart.lines();
            if lines.is_empty() {
                println!("El carrito está vacío");
                return Ok(());
            }
            for line in &lines {
                println!(
                    "{}  {} x{}  {}",
                    line.id,
                    line.product.name,
                    line.quantity,
                    line.line_total()
                );
            }
            println!();
            println!(
                "{} artículos, total {}",
                cart.total_item_count(),
                cart.total_price()
            );
        }
        CartAction::Add { id, quantity } => {
            let product = state.product(&id).await?;
            let in_cart = cart
                .lines()
                .iter()
                .find(|line| line.id == id)
                .map_or(0, |line| line.quantity);
            ensure_addable(&product, in_cart, quantity)?;
            cart.add_item(&product, quantity);
        }
        CartAction::Remove { id } => cart.remove_item(&id),
        CartAction::Update { id, quantity } => {
            if quantity > 0 {
                let lines = cart.lines();
                let line = lines.iter().find(|line| line.id == id).ok_or_else(|| {
                    Error::BadRequest(format!("El producto {id} no está en el carrito"))
                })?;
                if quantity > i64::from(line.product.stock) {
                    return Err(not_enough_stock(&line.product));
                }
            }
            cart.update_quantity(&id, quantity);
        }
        CartAction::Clear => cart.clear(),
        CartAction::Checkout => match state.checkout_url() {
            Some(url) => println!("{url}"),
            None => println!("El carrito está vacío"),
        },
    }
    Ok(())
}

/// The cart itself never clamps, so the stock limit is enforced here.
fn ensure_addable(product: &Product, in_cart: u32, requested: NonZeroU32) -> Result<()> {
    if !product.in_stock() {
        return Err(Error::BadRequest(format!("{} está agotado", product.name)));
    }
    if in_cart.saturating_add(requested.get()) > product.stock {
        return Err(not_enough_stock(product));
    }
    Ok(())
}

fn not_enough_stock(product: &Product) -> Error {
    Error::BadRequest(format!(
        "Solo hay {} unidades disponibles de {}",
        product.stock, product.name
    ))
}
