//! Ledgers: cart, wishlist, and orders.
//!
//! A ledger derives its working list from the identity session's current
//! snapshot, applies a pure transformation (from `cartwheel-core`) to a
//! clone, persists the **entire** `UserRecord` with a whole-document
//! replace, and only then pushes the server-confirmed record back into
//! the session. Local state is never updated ahead of a confirmed
//! persist, so a failed write leaves everything as it was.
//!
//! The shared-document contract also means ledgers can race each other:
//! a cart write and a wishlist write issued from stale snapshots resolve
//! last-writer-wins on the whole document. See the crate docs.

mod cart;
mod orders;
mod wishlist;

pub use cart::CartLedger;
pub use orders::{OrderLedger, PaymentGateway, PaymentOutcome, SimulatedGateway};
pub use wishlist::WishlistLedger;

use thiserror::Error;

use cartwheel_core::UserRecord;

use crate::session::IdentitySession;
use crate::store::{StoreError, UserDirectoryClient};

/// Errors raised by ledger mutations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// `place_order` was given no lines, or no user is signed in.
    #[error("nothing to order: no lines given or no user is signed in")]
    EmptyOrder,

    /// A quantity below 1 was requested. Quantities are never clamped;
    /// removing the line is the caller's job.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    /// The whole-document replace failed; local state is unchanged.
    #[error("failed to persist the user document: {0}")]
    PersistFailed(#[source] StoreError),

    /// The order's persist failed; no order was recorded and the cart is
    /// unchanged.
    #[error("order placement failed: {0}")]
    OrderPlacementFailed(#[source] StoreError),

    /// The payment gateway declined the charge.
    #[error("payment declined: {0}")]
    PaymentDeclined(String),
}

/// Replace the whole document remotely, then resync the session and the
/// session cache with what the store confirmed.
pub(crate) async fn persist_and_resync(
    directory: &UserDirectoryClient,
    session: &IdentitySession,
    record: UserRecord,
) -> Result<UserRecord, StoreError> {
    let confirmed = directory.replace(&record).await?;
    session.apply_update(confirmed.clone());
    Ok(confirmed)
}
