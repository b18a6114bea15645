//! Order ledger: checkout, order history, and the payment seam.

use std::future::Future;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use rust_decimal::Decimal;

use cartwheel_core::{
    CartLine, Order, OrderStatus, PaymentMethod, PaymentStatus, Product, ShippingAddress,
    compute_total,
};

use crate::session::IdentitySession;
use crate::store::UserDirectoryClient;

use super::{LedgerError, persist_and_resync};

/// Length of the random order-id suffix.
const ORDER_SUFFIX_LEN: usize = 5;

/// Outcome of a charge attempt.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub status: PaymentStatus,
    /// Decline reason, when the gateway reports one.
    pub reason: Option<String>,
}

/// Seam for the payment provider.
///
/// Checkout calls this before persisting the order; substituting a real
/// gateway changes nothing else in the ledger's contract.
pub trait PaymentGateway: Send + Sync {
    /// Attempt to charge the given amount.
    fn charge(
        &self,
        amount: Decimal,
        method: PaymentMethod,
        address: &ShippingAddress,
    ) -> impl Future<Output = PaymentOutcome> + Send;
}

/// The bundled gateway: records every charge as successful without
/// contacting anything. Payment here is simulated by design.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedGateway;

impl PaymentGateway for SimulatedGateway {
    async fn charge(
        &self,
        amount: Decimal,
        method: PaymentMethod,
        _address: &ShippingAddress,
    ) -> PaymentOutcome {
        tracing::debug!(%amount, %method, "simulated charge recorded as SUCCESS");
        PaymentOutcome {
            status: PaymentStatus::Success,
            reason: None,
        }
    }
}

/// Checkout and order history for the active user.
///
/// Placing an order appends to the user's `orders` and clears the cart
/// in the **same** document replace; the store never sees an
/// intermediate state. Nothing local changes until the store confirms.
#[derive(Clone)]
pub struct OrderLedger<G = SimulatedGateway> {
    session: IdentitySession,
    directory: UserDirectoryClient,
    gateway: G,
}

impl OrderLedger<SimulatedGateway> {
    /// Create an order ledger with the simulated gateway.
    #[must_use]
    pub const fn new(session: IdentitySession, directory: UserDirectoryClient) -> Self {
        Self::with_gateway(session, directory, SimulatedGateway)
    }
}

impl<G: PaymentGateway> OrderLedger<G> {
    /// Create an order ledger with a specific payment gateway.
    #[must_use]
    pub const fn with_gateway(
        session: IdentitySession,
        directory: UserDirectoryClient,
        gateway: G,
    ) -> Self {
        Self {
            session,
            directory,
            gateway,
        }
    }

    /// Place an order for the given lines.
    ///
    /// On success: the order (status `Placed`, total Σ price × quantity)
    /// is appended to the user's history, the cart is cleared in the same
    /// replace, the session resyncs, and the created order is returned.
    /// On persist failure nothing local changes - no false success.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::EmptyOrder`] when `lines` is empty or no user is
    ///   signed in
    /// - [`LedgerError::PaymentDeclined`] when the gateway declines
    /// - [`LedgerError::OrderPlacementFailed`] when the replace fails
    pub async fn place_order(
        &self,
        lines: Vec<CartLine>,
        method: PaymentMethod,
        address: ShippingAddress,
    ) -> Result<Order, LedgerError> {
        let Some(mut user) = self.session.current_user() else {
            return Err(LedgerError::EmptyOrder);
        };
        if lines.is_empty() {
            return Err(LedgerError::EmptyOrder);
        }

        let total = compute_total(&lines);
        let outcome = self.gateway.charge(total, method, &address).await;
        if outcome.status == PaymentStatus::Failed {
            return Err(LedgerError::PaymentDeclined(
                outcome.reason.unwrap_or_else(|| "charge failed".to_owned()),
            ));
        }

        let now = Utc::now();
        let order = Order {
            order_id: generate_order_id(now),
            items: lines,
            total_amount: total,
            payment_method: method,
            payment_status: outcome.status,
            shipping_address: address,
            order_status: OrderStatus::Placed,
            created_at: now,
        };

        user.orders.push(order.clone());
        user.cart.clear();

        persist_and_resync(&self.directory, &self.session, user)
            .await
            .map_err(LedgerError::OrderPlacementFailed)?;

        tracing::info!(order = %order.order_id, total = %order.total_amount, "order placed");
        Ok(order)
    }

    /// Check out the current cart.
    ///
    /// # Errors
    ///
    /// As [`place_order`](Self::place_order); an empty cart is
    /// [`LedgerError::EmptyOrder`].
    pub async fn place_cart_order(
        &self,
        method: PaymentMethod,
        address: ShippingAddress,
    ) -> Result<Order, LedgerError> {
        let lines = self
            .session
            .current_user()
            .map(|u| u.cart)
            .unwrap_or_default();
        self.place_order(lines, method, address).await
    }

    /// Direct purchase of a single product, bypassing the cart. The cart
    /// is still cleared by the placement, as the reference flow does.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidQuantity`] for a zero quantity, otherwise as
    /// [`place_order`](Self::place_order).
    pub async fn buy_now(
        &self,
        product: &Product,
        quantity: u32,
        method: PaymentMethod,
        address: ShippingAddress,
    ) -> Result<Order, LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity(quantity));
        }
        let line = CartLine::from_product(product, quantity);
        self.place_order(vec![line], method, address).await
    }

    /// The active user's order history (empty when signed out).
    #[must_use]
    pub fn order_history(&self) -> Vec<Order> {
        self.session
            .current_user()
            .map(|u| u.orders)
            .unwrap_or_default()
    }

    /// Find an order by id within the active user's history.
    #[must_use]
    pub fn order_by_id(&self, order_id: &str) -> Option<Order> {
        self.session
            .current_user()?
            .orders
            .into_iter()
            .find(|o| o.order_id == order_id)
    }
}

/// Generate an order id: `ORD_{unix_millis}_{5 uppercase alphanumerics}`.
///
/// Collision-resistant for a single store's volume, not guaranteed
/// unique; nothing ever checks it against existing orders.
fn generate_order_id(now: DateTime<Utc>) -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(ORDER_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("ORD_{}_{}", now.timestamp_millis(), suffix.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_shape() {
        let now = Utc::now();
        let id = generate_order_id(now);

        let mut parts = id.splitn(3, '_');
        assert_eq!(parts.next(), Some("ORD"));
        assert_eq!(
            parts.next().unwrap(),
            now.timestamp_millis().to_string(),
            "middle part is the millisecond timestamp"
        );
        let suffix = parts.next().unwrap();
        assert_eq!(suffix.len(), ORDER_SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()),
            "suffix is uppercased alphanumeric: {suffix}"
        );
    }

    #[test]
    fn test_order_ids_differ() {
        let now = Utc::now();
        // Same timestamp, random suffix: overwhelmingly distinct.
        let a = generate_order_id(now);
        let b = generate_order_id(now);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_simulated_gateway_always_succeeds() {
        let address = ShippingAddress {
            name: "A".into(),
            phone: "9".into(),
            street: "s".into(),
            city: "c".into(),
            state: "st".into(),
            pincode: "680001".into(),
        };
        let outcome = SimulatedGateway
            .charge(Decimal::new(100, 0), PaymentMethod::Upi, &address)
            .await;
        assert_eq!(outcome.status, PaymentStatus::Success);
        assert!(outcome.reason.is_none());
    }
}
