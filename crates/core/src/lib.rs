//! Cartwheel Core - Shared domain types.
//!
//! This crate provides the common types used across all Cartwheel components:
//! - `client` - Store synchronization core (directory, session, ledgers)
//! - `cli` - Command-line surface driving the client
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. Everything here mirrors the shape of the documents
//! held by the remote store: one `UserRecord` per account, carrying the
//! profile together with the cart, wishlist, and order history sub-lists.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, money, and statuses
//! - [`user`] - The `UserRecord` document and its pure list transformations
//! - [`product`] - The read-only catalog product

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod product;
pub mod types;
pub mod user;

pub use product::Product;
pub use types::*;
pub use user::{
    CartLine, NewUserRecord, Order, ShippingAddress, UserRecord, WishlistLine, compute_total,
};
