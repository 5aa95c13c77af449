//! Quantity policy for discrete and loose goods
//!
//! Loose goods are sold by weight in kilograms and move in 0.25 kg
//! steps with a 0.25 kg minimum. Discrete goods move in whole units
//! with a minimum of 1. The policy is the sole authority on what a
//! valid quantity is: the cart store routes every write through it.

use rust_decimal::prelude::*;
use thiserror::Error;

use crate::money::{to_decimal, DECIMAL_PLACES};

#[derive(Debug, Error, PartialEq)]
pub enum QuantityError {
    /// Below-minimum input is rejected, never silently clamped
    #[error("quantity {got} is below the minimum of {minimum}")]
    BelowMinimum { got: f64, minimum: f64 },

    /// Discrete items take whole units only
    #[error("quantity {0} is not a whole number of units")]
    NotDiscrete(f64),

    /// Loose quantities move in fixed weight steps
    #[error("quantity {got} is not a multiple of {increment}")]
    NotIncrement { got: f64, increment: f64 },

    #[error("quantity must be a finite number, got {0}")]
    NotFinite(f64),
}

/// Quantity rules for one purchasing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityPolicy {
    is_loose: bool,
}

impl QuantityPolicy {
    /// Policy for a product's purchasing mode
    pub fn for_mode(is_loose: bool) -> Self {
        Self { is_loose }
    }

    /// Step used by +/- controls: 0.25 kg for loose, 1 unit for discrete
    pub fn increment(&self) -> f64 {
        if self.is_loose { 0.25 } else { 1.0 }
    }

    /// Smallest quantity a line may hold; below this means removal
    pub fn minimum(&self) -> f64 {
        if self.is_loose { 0.25 } else { 1.0 }
    }

    /// Snap a quantity to its canonical representation
    ///
    /// Loose quantities round to 2 decimal places so accumulation like
    /// `0.25 + 0.25 + 0.25` stays exact; discrete quantities round to
    /// the nearest whole unit.
    pub fn round(&self, quantity: f64) -> f64 {
        let places = if self.is_loose { DECIMAL_PLACES } else { 0 };
        to_decimal(quantity)
            .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or_default()
    }

    /// Validate and canonicalize a user-supplied quantity
    ///
    /// Rounding first absorbs float noise (`0.250000001` is a valid
    /// quarter step); a value that is genuinely off the increment grid
    /// is rejected, never snapped to it.
    pub fn validate(&self, quantity: f64) -> Result<f64, QuantityError> {
        if !quantity.is_finite() {
            return Err(QuantityError::NotFinite(quantity));
        }
        let rounded = self.round(quantity);
        if rounded < self.minimum() {
            return Err(QuantityError::BelowMinimum {
                got: quantity,
                minimum: self.minimum(),
            });
        }
        if !self.is_loose && quantity.fract() != 0.0 {
            return Err(QuantityError::NotDiscrete(quantity));
        }
        if self.is_loose && !(to_decimal(rounded) % to_decimal(self.increment())).is_zero() {
            return Err(QuantityError::NotIncrement {
                got: quantity,
                increment: self.increment(),
            });
        }
        Ok(rounded)
    }
}
