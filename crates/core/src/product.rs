//! Catalog product type.
//!
//! Products are owned by the external catalog collection and are
//! read-only from this codebase's perspective; the ledgers only snapshot
//! their fields into cart and wishlist lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    /// Current selling price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Pre-discount price, when the product is on offer.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub original_price: Option<Decimal>,
    /// Units in stock. Some stores name this field `quantity`.
    #[serde(default, alias = "quantity")]
    pub stock: u32,
    pub image: String,
    #[serde(default)]
    pub description: String,
}

impl Product {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_wire_shape() {
        let raw = r#"{
            "id": "p1",
            "name": "Steel Bottle",
            "category": "kitchen",
            "price": 499,
            "originalPrice": 699.5,
            "quantity": 12,
            "image": "bottle.jpg",
            "description": "1L insulated"
        }"#;
        let p: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(p.price, Decimal::new(499, 0));
        assert_eq!(p.original_price, Some(Decimal::new(6995, 1)));
        assert_eq!(p.stock, 12, "quantity alias maps onto stock");
        assert!(p.in_stock());
    }

    #[test]
    fn test_out_of_stock() {
        let raw = r#"{"id": "p2", "name": "X", "category": "c", "price": 1, "stock": 0, "image": ""}"#;
        let p: Product = serde_json::from_str(raw).unwrap();
        assert!(!p.in_stock());
    }
}
