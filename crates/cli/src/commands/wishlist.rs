//! Wishlist commands.

use clap::Subcommand;

use cartwheel_client::WishlistLedger;
use cartwheel_core::{ProductId, display_amount};

use super::{CliError, Context};

#[derive(Subcommand)]
pub enum WishlistAction {
    /// Show the wishlist
    Show,
    /// Toggle a product's wishlist presence
    Toggle {
        /// Product id
        product_id: String,
    },
    /// Remove a product from the wishlist
    Remove {
        /// Product id
        product_id: String,
    },
}

pub async fn run(action: WishlistAction) -> Result<(), CliError> {
    let ctx = Context::load()?;
    ctx.require_user()?;
    let wishlist = WishlistLedger::new(ctx.session.clone(), ctx.directory.clone());

    match action {
        WishlistAction::Show => {
            let items = wishlist.items();
            if items.is_empty() {
                println!("Wishlist is empty");
                return Ok(());
            }
            for item in &items {
                println!("{}  {}  {}", item.product_id, item.name, display_amount(item.price));
            }
        }
        WishlistAction::Toggle { product_id } => {
            let product = ctx.catalog.get_product(&ProductId::new(product_id)).await?;
            let now_present = wishlist.toggle(&product).await?;
            if now_present {
                println!("Added {} to wishlist", product.name);
            } else {
                println!("Removed {} from wishlist", product.name);
            }
        }
        WishlistAction::Remove { product_id } => {
            wishlist.remove_item(&ProductId::new(product_id)).await?;
            println!("Removed");
        }
    }
    Ok(())
}
