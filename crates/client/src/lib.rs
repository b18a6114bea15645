//! Cartwheel Client - user-state synchronization core.
//!
//! The remote store keeps one `UserRecord` document per account (profile,
//! cart, wishlist, order history) and offers only whole-document replace
//! as a write primitive. This crate owns the machinery around that
//! contract:
//!
//! - [`store`] - REST clients for the user directory and the read-only
//!   product catalog (moka-cached)
//! - [`session`] - the identity session: login/register/logout, the
//!   durable session cache, the suspension polling watch, and
//!   cross-context change mirroring
//! - [`ledger`] - cart, wishlist, and order ledgers, each deriving a
//!   working list from the session snapshot, mutating a copy, and
//!   persisting the whole document back
//! - [`admin`] - flows operating on *other* users' documents (order
//!   status overrides, account blocking)
//!
//! # Consistency model
//!
//! Every mutation round-trips the entire `UserRecord`. Two writers racing
//! on the same document (another ledger, another tab, an admin) resolve
//! last-writer-wins on the whole document, not per-field, so a concurrent
//! mutation made between a read and a write can be silently lost. That is
//! the store's contract; this crate preserves it rather than layering
//! locking on top. What it does guarantee: local state is only updated
//! after the store confirms a write, so the caller never sees a success
//! that was not persisted.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod config;
pub mod ledger;
pub mod session;
pub mod store;

pub use admin::{AdminClient, AdminError, PlacedOrder};
pub use config::{ClientConfig, ConfigError};
pub use ledger::{
    CartLedger, LedgerError, OrderLedger, PaymentGateway, PaymentOutcome, SimulatedGateway,
    WishlistLedger,
};
pub use session::{AuthError, CacheEvent, IdentitySession, SessionCache, SessionEvent};
pub use store::{CatalogClient, StoreError, UserDirectoryClient};
