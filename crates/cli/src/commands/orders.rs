//! Checkout and order history commands.

use clap::{Args, Subcommand};

use cartwheel_client::OrderLedger;
use cartwheel_core::{PaymentMethod, ProductId, ShippingAddress, display_amount};

use super::{CliError, Context};

/// Shipping address flags shared by checkout and buy-now.
#[derive(Args)]
pub struct AddressArgs {
    /// Recipient name (defaults to the account name)
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    street: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    state: String,

    #[arg(long)]
    pincode: String,
}

impl AddressArgs {
    fn into_address(self, account_name: &str) -> ShippingAddress {
        ShippingAddress {
            name: self.name.unwrap_or_else(|| account_name.to_owned()),
            phone: self.phone,
            street: self.street,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
        }
    }
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// Place an order for the whole cart
    Checkout {
        /// Payment method: cod, upi, or creditcard
        #[arg(short, long, default_value = "cod")]
        method: String,

        #[command(flatten)]
        address: AddressArgs,
    },
    /// Buy a single product directly, bypassing the cart
    BuyNow {
        /// Product id
        product_id: String,

        /// Units to buy
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Payment method: cod, upi, or creditcard
        #[arg(short, long, default_value = "cod")]
        method: String,

        #[command(flatten)]
        address: AddressArgs,
    },
    /// List the order history
    List,
    /// Show one order
    Show {
        /// Order id
        order_id: String,
    },
}

pub async fn run(action: OrderAction) -> Result<(), CliError> {
    let ctx = Context::load()?;
    let user = ctx.require_user()?;
    let orders = OrderLedger::new(ctx.session.clone(), ctx.directory.clone());

    match action {
        OrderAction::Checkout { method, address } => {
            let method: PaymentMethod = method.parse().map_err(CliError::Usage)?;
            let order = orders
                .place_cart_order(method, address.into_address(&user.name))
                .await?;
            println!(
                "Order {} placed: {} ({} items, {})",
                order.order_id,
                display_amount(order.total_amount),
                order.items.len(),
                order.payment_method
            );
        }
        OrderAction::BuyNow {
            product_id,
            quantity,
            method,
            address,
        } => {
            let method: PaymentMethod = method.parse().map_err(CliError::Usage)?;
            let product = ctx.catalog.get_product(&ProductId::new(product_id)).await?;
            let order = orders
                .buy_now(&product, quantity, method, address.into_address(&user.name))
                .await?;
            println!(
                "Order {} placed: {} × {} for {}",
                order.order_id,
                quantity,
                product.name,
                display_amount(order.total_amount)
            );
        }
        OrderAction::List => {
            let history = orders.order_history();
            if history.is_empty() {
                println!("No orders yet");
                return Ok(());
            }
            for order in &history {
                println!(
                    "{}  {}  {}  {} item(s)  {}",
                    order.order_id,
                    order.created_at.format("%Y-%m-%d %H:%M"),
                    order.order_status,
                    order.items.len(),
                    display_amount(order.total_amount)
                );
            }
        }
        OrderAction::Show { order_id } => {
            let Some(order) = orders.order_by_id(&order_id) else {
                return Err(CliError::Usage(format!("no order {order_id} in your history")));
            };
            println!("{}  {}", order.order_id, order.order_status);
            println!("  placed: {}", order.created_at.to_rfc3339());
            println!("  payment: {} ({:?})", order.payment_method, order.payment_status);
            for item in &order.items {
                println!(
                    "  {} × {}  =  {}",
                    item.name,
                    item.quantity,
                    display_amount(item.line_total())
                );
            }
            println!("  total: {}", display_amount(order.total_amount));
            let a = &order.shipping_address;
            println!(
                "  ship to: {}, {}, {}, {} {} ({})",
                a.name, a.street, a.city, a.state, a.pincode, a.phone
            );
        }
    }
    Ok(())
}
