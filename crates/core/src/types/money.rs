//! Money display helpers.
//!
//! Prices travel as plain JSON numbers in the stored documents, so the
//! document types use [`rust_decimal::Decimal`] fields directly (see the
//! `rust_decimal::serde::float` annotations in [`crate::user`]). The only
//! currency concern this crate carries is display formatting.

use rust_decimal::Decimal;

/// Currency symbol used for display.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Format an amount for display, e.g. `₹299.00`.
#[must_use]
pub fn display_amount(amount: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_amount() {
        assert_eq!(display_amount(Decimal::new(29900, 2)), "₹299.00");
        assert_eq!(display_amount(Decimal::new(5, 1)), "₹0.50");
    }
}
