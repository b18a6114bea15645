//! Admin console commands.
//!
//! These operate on other users' documents through the full-collection
//! scan the store offers; the signed-in account must have the Admin role.

use clap::Subcommand;

use cartwheel_client::AdminClient;
use cartwheel_core::{OrderStatus, UserId, display_amount};

use super::{CliError, Context};

#[derive(Subcommand)]
pub enum AdminAction {
    /// List every order across all users, newest first
    Orders,
    /// Set an order's status (any status from any status)
    SetStatus {
        /// Order id
        order_id: String,

        /// New status: placed, processing, shipped, delivered, cancelled
        status: String,
    },
    /// List all user accounts
    Users,
    /// Block an account (its live sessions are logged out within one
    /// polling interval)
    Block {
        /// User id
        user_id: String,
    },
    /// Unblock an account
    Unblock {
        /// User id
        user_id: String,
    },
    /// Delete an account's document
    DeleteUser {
        /// User id
        user_id: String,
    },
}

pub async fn run(action: AdminAction) -> Result<(), CliError> {
    let ctx = Context::load()?;
    let user = ctx.require_user()?;
    if !user.is_admin() {
        return Err(CliError::Usage(format!(
            "{} is not an Admin account",
            user.email
        )));
    }
    let admin = AdminClient::new(ctx.directory.clone());

    match action {
        AdminAction::Orders => {
            let rows = admin.all_orders().await?;
            for row in &rows {
                println!(
                    "{}  {}  {}  {} <{}>  {}",
                    row.order.order_id,
                    row.order.created_at.format("%Y-%m-%d %H:%M"),
                    row.order.order_status,
                    row.user_name,
                    row.user_email,
                    display_amount(row.order.total_amount)
                );
            }
            println!("{} orders", rows.len());
        }
        AdminAction::SetStatus { order_id, status } => {
            let status: OrderStatus = status.parse().map_err(CliError::Usage)?;
            let order = admin.update_order_status(&order_id, status).await?;
            println!("Order {} is now {}", order.order_id, order.order_status);
        }
        AdminAction::Users => {
            let users = admin.list_users().await?;
            for u in &users {
                println!(
                    "{}  {} <{}>  {:?}{}  {} orders",
                    u.id,
                    u.name,
                    u.email,
                    u.role,
                    if u.is_block { "  [BLOCKED]" } else { "" },
                    u.orders.len()
                );
            }
        }
        AdminAction::Block { user_id } => {
            let blocked = admin.set_blocked(&UserId::new(user_id), true).await?;
            println!("Blocked {} <{}>", blocked.name, blocked.email);
        }
        AdminAction::Unblock { user_id } => {
            let unblocked = admin.set_blocked(&UserId::new(user_id), false).await?;
            println!("Unblocked {} <{}>", unblocked.name, unblocked.email);
        }
        AdminAction::DeleteUser { user_id } => {
            admin.delete_user(&UserId::new(user_id)).await?;
            println!("Deleted");
        }
    }
    Ok(())
}
