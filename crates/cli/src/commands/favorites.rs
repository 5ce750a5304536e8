//! Favorites commands.

use clap::Subcommand;

use vitrina_core::ProductId;
use vitrina_storefront::error::Result;
use vitrina_storefront::state::AppState;

use super::product_line;

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List favorites
    List,
    /// Add a product to favorites
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Remove a product from favorites
    Remove {
        /// Product ID
        id: ProductId,
    },
}

#[allow(clippy::print_stdout)]
pub async fn run(state: &AppState, action: FavoritesAction) -> Result<()> {
    state.initialize().await?;
    let favorites = state.favorites();

    match action {
        FavoritesAction::List => {
            if favorites.identity().is_none() {
                println!("Inicia sesión para ver tus favoritos");
                return Ok(());
            }
            let list = favorites.favorites();
            if list.is_empty() {
                println!("No tienes favoritos");
            }
            for favorite in list.iter() {
                println!("{}", product_line(&favorite.product));
            }
        }
        FavoritesAction::Add { id } => favorites.add(&id).await,
        FavoritesAction::Remove { id } => favorites.remove(&id).await,
    }
    Ok(())
}
