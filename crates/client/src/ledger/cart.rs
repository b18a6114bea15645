//! Cart ledger.

use rust_decimal::Decimal;

use cartwheel_core::{CartLine, Product, ProductId};

use crate::session::IdentitySession;
use crate::store::UserDirectoryClient;

use super::{LedgerError, persist_and_resync};

/// The shopping cart for the active user.
///
/// The working list is always derived from the session snapshot; this
/// type holds no list state of its own. Mutations on a signed-out
/// session are silent no-ops (mirroring a storefront where the cart
/// buttons simply do nothing until login).
#[derive(Clone)]
pub struct CartLedger {
    session: IdentitySession,
    directory: UserDirectoryClient,
}

impl CartLedger {
    /// Create a cart ledger over a session.
    #[must_use]
    pub const fn new(session: IdentitySession, directory: UserDirectoryClient) -> Self {
        Self { session, directory }
    }

    /// The current cart lines (empty when signed out).
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.session
            .current_user()
            .map(|u| u.cart)
            .unwrap_or_default()
    }

    /// Total of the current cart.
    #[must_use]
    pub fn total(&self) -> Decimal {
        cartwheel_core::compute_total(&self.lines())
    }

    /// Add a product to the cart. If a line for it already exists, its
    /// quantity is incremented by `quantity` instead of duplicating the
    /// line. No-op when signed out.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidQuantity`] for a zero quantity, or
    /// [`LedgerError::PersistFailed`] if the replace fails (local state
    /// unchanged).
    pub async fn add_line(&self, product: &Product, quantity: u32) -> Result<(), LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity(quantity));
        }
        let Some(mut user) = self.session.current_user() else {
            tracing::debug!(product = %product.id, "add_line ignored: signed out");
            return Ok(());
        };

        user.add_cart_line(product, quantity);
        self.persist(user).await
    }

    /// Remove the line for a product. A missing line is a no-op and
    /// performs no network call. No-op when signed out.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PersistFailed`] if the replace fails.
    pub async fn remove_line(&self, product_id: &ProductId) -> Result<(), LedgerError> {
        let Some(mut user) = self.session.current_user() else {
            return Ok(());
        };

        if !user.remove_cart_line(product_id) {
            return Ok(());
        }
        self.persist(user).await
    }

    /// Replace the quantity on an existing line. Quantities below 1 are
    /// rejected, not clamped: callers that want zero call
    /// [`remove_line`](Self::remove_line). No-op when the product has no
    /// line or when signed out.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidQuantity`] for a quantity below 1,
    /// or [`LedgerError::PersistFailed`] if the replace fails.
    pub async fn set_quantity(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity(quantity));
        }
        let Some(mut user) = self.session.current_user() else {
            return Ok(());
        };

        if !user.set_cart_quantity(product_id, quantity) {
            return Ok(());
        }
        self.persist(user).await
    }

    async fn persist(&self, user: cartwheel_core::UserRecord) -> Result<(), LedgerError> {
        persist_and_resync(&self.directory, &self.session, user)
            .await
            .map(drop)
            .map_err(LedgerError::PersistFailed)
    }
}
