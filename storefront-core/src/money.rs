//! Money calculation utilities using rust_decimal for precision
//!
//! Stored and serialized values are `f64` (the backend's JSON shape);
//! every calculation converts to `Decimal`, computes, then rounds back
//! to 2 decimal places. Quantities go through the same helpers so that
//! repeated `+0.25` on a loose item never accumulates float noise.

use rust_decimal::prelude::*;
use shared::models::CartItem;

/// Rounding for monetary values and loose quantities (2 dp, half-up)
pub const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Line total: `unit_price * quantity`, rounded to 2 dp
pub fn line_total(item: &CartItem) -> f64 {
    to_f64(to_decimal(item.unit_price) * to_decimal(item.quantity))
}

/// Cart subtotal: sum of line totals over all items
///
/// Recomputed on demand so it can never drift from the line items.
/// Sums the rounded per-line figures, so the subtotal always equals
/// what the individual lines display.
pub fn cart_subtotal(items: &[CartItem]) -> f64 {
    let sum: Decimal = items.iter().map(|item| to_decimal(line_total(item))).sum();
    to_f64(sum)
}

/// Sum of quantities over all items (the cart badge count)
pub fn cart_count(items: &[CartItem]) -> f64 {
    let sum: Decimal = items.iter().map(|item| to_decimal(item.quantity)).sum();
    to_f64(sum)
}
