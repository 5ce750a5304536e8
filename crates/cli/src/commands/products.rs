//! Catalog commands.

use clap::Subcommand;

use vitrina_core::{Category, ProductId};
use vitrina_storefront::error::Result;
use vitrina_storefront::state::AppState;

use super::product_line;

#[derive(Subcommand)]
pub enum ProductsAction {
    /// List products, newest first
    List {
        /// Only this category (ropa, calzado, regalos)
        #[arg(short, long)]
        category: Option<Category>,

        /// Only the featured products shown on the home page
        #[arg(short, long, conflicts_with = "category")]
        featured: bool,
    },
    /// Show one product
    Show {
        /// Product ID
        id: ProductId,
    },
}

#[allow(clippy::print_stdout)]
pub async fn run(state: &AppState, action: ProductsAction) -> Result<()> {
    match action {
        ProductsAction::List { category, featured } => {
            let catalog = state.catalog();
            let products = if featured {
                catalog.featured().await?
            } else if let Some(category) = category {
                catalog.by_category(category).await?
            } else {
                catalog.products().await?.to_vec()
            };

            if products.is_empty() {
                println!("No hay productos");
            }
            for product in &products {
                println!("{}", product_line(product));
            }
        }
        ProductsAction::Show { id } => {
            let product = state.product(&id).await?;
            println!("{}", product.name);
            println!("Precio:     {}", product.price);
            println!("Categoría:  {}", product.category);
            println!("Existencia: {}", product.stock);
            if !product.description.is_empty() {
                println!();
                println!("{}", product.description);
            }
        }
    }
    Ok(())
}
