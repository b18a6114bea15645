//! Catalog browsing commands.

use clap::Subcommand;

use cartwheel_core::{ProductId, display_amount};

use super::{CliError, Context};

#[derive(Subcommand)]
pub enum ProductsAction {
    /// List catalog products
    List {
        /// Only show products with stock left
        #[arg(long)]
        in_stock: bool,
    },
    /// Show one product
    Show {
        /// Product id
        product_id: String,
    },
}

pub async fn run(action: ProductsAction) -> Result<(), CliError> {
    let ctx = Context::load()?;

    match action {
        ProductsAction::List { in_stock } => {
            let products = if in_stock {
                ctx.catalog.list_in_stock().await?
            } else {
                ctx.catalog.list_products().await?
            };
            for p in &products {
                println!(
                    "{}  {}  {}  [{}]  stock {}",
                    p.id,
                    p.name,
                    display_amount(p.price),
                    p.category,
                    p.stock
                );
            }
            println!("{} products", products.len());
        }
        ProductsAction::Show { product_id } => {
            let p = ctx.catalog.get_product(&ProductId::new(product_id)).await?;
            println!("{}  {}", p.id, p.name);
            println!("  category: {}", p.category);
            match p.original_price {
                Some(original) => println!(
                    "  price: {} (was {})",
                    display_amount(p.price),
                    display_amount(original)
                ),
                None => println!("  price: {}", display_amount(p.price)),
            }
            println!("  stock: {}", p.stock);
            if !p.description.is_empty() {
                println!("  {}", p.description);
            }
        }
    }
    Ok(())
}
