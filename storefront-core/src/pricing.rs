//! Pricing engine - subtotal to order total
//!
//! One shared implementation of the threshold rules, called by both
//! the cart summary path and order submission so the two can never
//! disagree.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::money::{to_decimal, to_f64, DECIMAL_PLACES};

/// Orders above this subtotal ship free
const FREE_DELIVERY_THRESHOLD: f64 = 500.0;
/// Flat delivery fee below the free-delivery threshold
const DELIVERY_FEE: f64 = 40.0;
/// Orders above this subtotal earn the discount
const DISCOUNT_THRESHOLD: f64 = 1000.0;
/// Discount rate applied above the threshold (0.10)
const DISCOUNT_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Monetary breakdown of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub discount: f64,
    pub total: f64,
}

/// Compute delivery fee, discount and grand total from a subtotal
///
/// The two thresholds are independent: a subtotal in (500, 1000] gets
/// free delivery without the discount; above 1000 gets both. Exactly
/// one discount tier exists, no stacking.
pub fn compute_totals(subtotal: f64) -> OrderTotals {
    let sub = to_decimal(subtotal);

    let delivery_fee = if subtotal > FREE_DELIVERY_THRESHOLD {
        Decimal::ZERO
    } else {
        to_decimal(DELIVERY_FEE)
    };

    // Round the discount before subtracting so the total always equals
    // the displayed subtotal + fee - discount
    let discount = if subtotal > DISCOUNT_THRESHOLD {
        (sub * DISCOUNT_RATE)
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };

    let total = sub + delivery_fee - discount;

    OrderTotals {
        subtotal: to_f64(sub),
        delivery_fee: to_f64(delivery_fee),
        discount: to_f64(discount),
        total: to_f64(total),
    }
}
