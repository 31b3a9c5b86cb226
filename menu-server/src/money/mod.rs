//! Money calculation utilities using rust_decimal for precision
//!
//! All order math is done in `Decimal` internally and converted to `f64`
//! only for storage/serialization. Every totals-bearing view (cart,
//! pre-checkout summary, confirmation, history, fulfillment queue) goes
//! through [`order_totals`] so they cannot drift apart.

use rust_decimal::prelude::*;
use serde::Serialize;

use crate::utils::AppError;
use shared::models::CartLine;

/// Rounding precision for monetary values (2 decimal places)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed dish price (5 significant digits, 2 decimals)
pub const MAX_PRICE: f64 = 999.99;

/// Convert f64 to Decimal. Non-finite input degrades to zero with a log
/// instead of poisoning the whole order.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // SAFETY: Decimal rounded to 2dp with inputs bounded by MAX_PRICE and
        // small quantities is always within f64 representable range
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Validate a price coming in from the API and normalize it to 2 decimals.
pub fn validate_price(value: f64, field: &str) -> Result<f64, AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_PRICE {
        return Err(AppError::validation(format!(
            "{field} exceeds the maximum of {MAX_PRICE}"
        )));
    }
    Ok(to_f64(to_decimal(value)))
}

/// One line's total: unit price × quantity
#[inline]
pub fn line_total(unit_price: f64, amount: i64) -> Decimal {
    to_decimal(unit_price) * Decimal::from(amount)
}

/// Computed totals for a cart or delivery
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
}

/// Sum a set of cart lines and add the delivery fee.
///
/// The lines carry the effective unit price (current dish price when the
/// dish still exists, otherwise the add-time snapshot); the fee is either
/// the configured default (no delivery yet) or the delivery's stored fee.
pub fn order_totals(lines: &[CartLine], delivery_fee: f64) -> OrderTotals {
    let subtotal: Decimal = lines
        .iter()
        .map(|line| line_total(line.unit_price, line.amount))
        .sum();
    let total = subtotal + to_decimal(delivery_fee);

    OrderTotals {
        subtotal: to_f64(subtotal),
        delivery_fee: to_f64(to_decimal(delivery_fee)),
        total: to_f64(total),
    }
}

#[cfg(test)]
mod tests;
