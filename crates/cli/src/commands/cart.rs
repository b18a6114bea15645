//! Cart commands.

use clap::Subcommand;

use cartwheel_client::CartLedger;
use cartwheel_core::{ProductId, display_amount};

use super::{CliError, Context};

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product's line from the cart
    Remove {
        /// Product id
        product_id: String,
    },
    /// Replace the quantity on a cart line
    SetQty {
        /// Product id
        product_id: String,

        /// New quantity (at least 1; use `remove` for zero)
        quantity: u32,
    },
}

pub async fn run(action: CartAction) -> Result<(), CliError> {
    let ctx = Context::load()?;
    ctx.require_user()?;
    let cart = CartLedger::new(ctx.session.clone(), ctx.directory.clone());

    match action {
        CartAction::Show => {
            let lines = cart.lines();
            if lines.is_empty() {
                println!("Cart is empty");
                return Ok(());
            }
            for line in &lines {
                println!(
                    "{}  {} × {}  =  {}",
                    line.product_id,
                    line.name,
                    line.quantity,
                    display_amount(line.line_total())
                );
            }
            println!("Total: {}", display_amount(cart.total()));
        }
        CartAction::Add {
            product_id,
            quantity,
        } => {
            let product = ctx.catalog.get_product(&ProductId::new(product_id)).await?;
            cart.add_line(&product, quantity).await?;
            println!("Added {} × {}", quantity, product.name);
        }
        CartAction::Remove { product_id } => {
            cart.remove_line(&ProductId::new(product_id)).await?;
            println!("Removed");
        }
        CartAction::SetQty {
            product_id,
            quantity,
        } => {
            cart.set_quantity(&ProductId::new(product_id), quantity)
                .await?;
            println!("Quantity set to {quantity}");
        }
    }
    Ok(())
}
