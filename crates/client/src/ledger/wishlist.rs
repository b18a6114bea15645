//! Wishlist ledger.

use cartwheel_core::{Product, ProductId, WishlistLine};

use crate::session::IdentitySession;
use crate::store::UserDirectoryClient;

use super::{LedgerError, persist_and_resync};

/// The wishlist for the active user.
///
/// Presence is the whole signal: at most one entry per product, and
/// [`toggle`](Self::toggle) is the operation most callers use. Same
/// derive-mutate-replace contract (and the same whole-document race) as
/// the cart ledger.
#[derive(Clone)]
pub struct WishlistLedger {
    session: IdentitySession,
    directory: UserDirectoryClient,
}

impl WishlistLedger {
    /// Create a wishlist ledger over a session.
    #[must_use]
    pub const fn new(session: IdentitySession, directory: UserDirectoryClient) -> Self {
        Self { session, directory }
    }

    /// The current wishlist entries (empty when signed out).
    #[must_use]
    pub fn items(&self) -> Vec<WishlistLine> {
        self.session
            .current_user()
            .map(|u| u.wishlist)
            .unwrap_or_default()
    }

    /// Whether a product is wishlisted. Pure lookup, no network call.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.session
            .current_user()
            .is_some_and(|u| u.has_wishlisted(product_id))
    }

    /// Add a product. Already-present is a no-op with no network call.
    /// No-op when signed out.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PersistFailed`] if the replace fails.
    pub async fn add_item(&self, product: &Product) -> Result<(), LedgerError> {
        let Some(mut user) = self.session.current_user() else {
            return Ok(());
        };

        if !user.add_wishlist_item(product) {
            return Ok(());
        }
        self.persist(user).await
    }

    /// Remove a product. Absent is a no-op with no network call. No-op
    /// when signed out.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PersistFailed`] if the replace fails.
    pub async fn remove_item(&self, product_id: &ProductId) -> Result<(), LedgerError> {
        let Some(mut user) = self.session.current_user() else {
            return Ok(());
        };

        if !user.remove_wishlist_item(product_id) {
            return Ok(());
        }
        self.persist(user).await
    }

    /// Toggle a product's presence. Returns whether the product is
    /// present after the call (`false` when signed out).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PersistFailed`] if the replace fails.
    pub async fn toggle(&self, product: &Product) -> Result<bool, LedgerError> {
        let Some(mut user) = self.session.current_user() else {
            return Ok(false);
        };

        let now_present = user.toggle_wishlist(product);
        self.persist(user).await?;
        Ok(now_present)
    }

    async fn persist(&self, user: cartwheel_core::UserRecord) -> Result<(), LedgerError> {
        persist_and_resync(&self.directory, &self.session, user)
            .await
            .map(drop)
            .map_err(LedgerError::PersistFailed)
    }
}
