//! The `UserRecord` document and its sub-records.
//!
//! The remote store keeps exactly one document per account: profile fields
//! plus the `cart`, `wishlist`, and `orders` sub-lists, all replaced
//! whole on every write. Field names are camelCase on the wire
//! (`isBlock`, `createdAt`, `productId`, ...), matching what deployed
//! stores already hold.
//!
//! All list mutations live here as pure functions so the ledgers in the
//! client crate stay thin: derive, transform, persist. Each mutator
//! reports whether it changed the document, which lets callers skip the
//! network round-trip for no-op mutations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{
    Email, OrderStatus, PaymentMethod, PaymentStatus, ProductId, Role, UserId,
};

// =============================================================================
// Sub-records
// =============================================================================

/// One line of a shopping cart.
///
/// Name, price, and image are snapshotted from the product at add time and
/// never re-priced. At most one line exists per product id; adding the
/// same product again increments the quantity instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Product name at add time.
    pub name: String,
    /// Unit price at add time.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Product image URL at add time.
    pub image: String,
    /// Number of units, always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Snapshot a product into a cart line.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }

    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// One wishlist entry. Presence is the whole signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistLine {
    /// Product this entry refers to.
    pub product_id: ProductId,
    /// Product name at add time.
    pub name: String,
    /// Unit price at add time.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Product image URL at add time.
    pub image: String,
}

impl WishlistLine {
    /// Snapshot a product into a wishlist entry.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

/// Shipping address recorded with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// A placed order, immutable from the customer's side.
///
/// `order_id` is a client-generated timestamp-plus-random string. It is
/// collision-resistant, not guaranteed unique; the store never checks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    /// Snapshot of the cart lines being purchased.
    pub items: Vec<CartLine>,
    /// Σ price × quantity, computed once at placement and frozen.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub shipping_address: ShippingAddress,
    pub order_status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// UserRecord
// =============================================================================

/// The single persisted document for one account.
///
/// The password is stored in plaintext and compared client-side; that is
/// the deployed store's contract, not something this crate can upgrade
/// unilaterally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Store-assigned identifier.
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password: String,
    pub role: Role,
    /// Server-side suspension flag, set by admins.
    pub is_block: bool,
    pub created_at: DateTime<Utc>,
    /// Older documents may lack the sub-lists entirely.
    #[serde(default)]
    pub cart: Vec<CartLine>,
    #[serde(default)]
    pub wishlist: Vec<WishlistLine>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// A user document before the store has assigned an id (`POST` body).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserRecord {
    pub name: String,
    pub email: Email,
    pub password: String,
    pub role: Role,
    pub is_block: bool,
    pub created_at: DateTime<Utc>,
    pub cart: Vec<CartLine>,
    pub wishlist: Vec<WishlistLine>,
    pub orders: Vec<Order>,
}

impl NewUserRecord {
    /// Build the document for a fresh registration: role `User`, not
    /// blocked, empty cart, wishlist, and order history.
    #[must_use]
    pub fn registration(name: impl Into<String>, email: Email, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email,
            password: password.into(),
            role: Role::User,
            is_block: false,
            created_at: Utc::now(),
            cart: Vec::new(),
            wishlist: Vec::new(),
            orders: Vec::new(),
        }
    }
}

impl UserRecord {
    /// Whether this account has the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    // -------------------------------------------------------------------------
    // Cart transformations
    // -------------------------------------------------------------------------

    /// Add a product to the cart, incrementing the quantity if a line for
    /// it already exists. Returns `true` (the document always changes).
    ///
    /// Callers are responsible for rejecting a zero quantity before
    /// getting here.
    pub fn add_cart_line(&mut self, product: &Product, quantity: u32) -> bool {
        if let Some(line) = self.cart.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity += quantity;
        } else {
            self.cart.push(CartLine::from_product(product, quantity));
        }
        true
    }

    /// Remove the cart line for a product. Returns `false` if no such
    /// line existed (the document is unchanged).
    pub fn remove_cart_line(&mut self, product_id: &ProductId) -> bool {
        let before = self.cart.len();
        self.cart.retain(|l| &l.product_id != product_id);
        self.cart.len() != before
    }

    /// Replace the quantity on an existing cart line. Returns `false` if
    /// the product has no line or the quantity is already the same.
    pub fn set_cart_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        match self.cart.iter_mut().find(|l| &l.product_id == product_id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Total of the current cart.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        compute_total(&self.cart)
    }

    // -------------------------------------------------------------------------
    // Wishlist transformations
    // -------------------------------------------------------------------------

    /// Whether a product is currently wishlisted.
    #[must_use]
    pub fn has_wishlisted(&self, product_id: &ProductId) -> bool {
        self.wishlist.iter().any(|w| &w.product_id == product_id)
    }

    /// Add a product to the wishlist. Returns `false` if already present.
    pub fn add_wishlist_item(&mut self, product: &Product) -> bool {
        if self.has_wishlisted(&product.id) {
            return false;
        }
        self.wishlist.push(WishlistLine::from_product(product));
        true
    }

    /// Remove a product from the wishlist. Returns `false` if absent.
    pub fn remove_wishlist_item(&mut self, product_id: &ProductId) -> bool {
        let before = self.wishlist.len();
        self.wishlist.retain(|w| &w.product_id != product_id);
        self.wishlist.len() != before
    }

    /// Toggle a product's wishlist presence. Returns `true` when the
    /// product is present after the call.
    pub fn toggle_wishlist(&mut self, product: &Product) -> bool {
        if self.remove_wishlist_item(&product.id) {
            false
        } else {
            self.wishlist.push(WishlistLine::from_product(product));
            true
        }
    }
}

/// Σ price × quantity over a set of lines.
#[must_use]
pub fn compute_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}
