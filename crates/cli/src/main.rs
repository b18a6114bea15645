//! Cartwheel CLI - storefront and admin console over the remote store.
//!
//! # Usage
//!
//! ```bash
//! # Account
//! cw-cli register -n "Asha" -e asha@example.com -p secret12
//! cw-cli login -e asha@example.com -p secret12
//! cw-cli whoami
//! cw-cli logout
//!
//! # Shopping
//! cw-cli products list --in-stock
//! cw-cli cart add p1 --quantity 2
//! cw-cli cart show
//! cw-cli wishlist toggle p2
//! cw-cli orders checkout --method cod --phone 999 --street "1 MG Rd" \
//!     --city Kochi --state KL --pincode 682001
//! cw-cli orders list
//!
//! # Admin
//! cw-cli admin orders
//! cw-cli admin set-status ORD_1717236000000_AB12C shipped
//! cw-cli admin block u7
//! ```
//!
//! # Environment Variables
//!
//! - `STORE_API_URL` - Base URL of the remote document store (required)
//! - `CARTWHEEL_SESSION_FILE` - Session slot path; the login session
//!   survives between invocations through this file
//! - `CARTWHEEL_POLL_INTERVAL_SECS` - Suspension watch interval

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

use commands::{CartAction, OrderAction, ProductsAction, WishlistAction};

#[derive(Parser)]
#[command(name = "cw-cli")]
#[command(author, version, about = "Cartwheel storefront and admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Sign in
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Checkout and order history
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Admin console (requires an Admin account)
    Admin {
        #[command(subcommand)]
        action: commands::AdminAction,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Register {
            name,
            email,
            password,
        } => commands::auth::register(&name, &email, &password).await?,
        Commands::Login { email, password } => commands::auth::login(&email, &password).await?,
        Commands::Logout => commands::auth::logout().await?,
        Commands::Whoami => commands::auth::whoami().await?,
        Commands::Products { action } => commands::products::run(action).await?,
        Commands::Cart { action } => commands::cart::run(action).await?,
        Commands::Wishlist { action } => commands::wishlist::run(action).await?,
        Commands::Orders { action } => commands::orders::run(action).await?,
        Commands::Admin { action } => commands::admin::run(action).await?,
    }
    Ok(())
}
