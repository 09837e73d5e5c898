//! Monetary formatting for provider payloads.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Number;
use std::str::FromStr;

use crate::payments::error::{PaymentError, PaymentResult};

/// Convert a JSON-sourced amount into a decimal.
///
/// Goes through the shortest decimal rendering of the float so that `10.005`
/// is treated as ten and five thousandths, not as its binary approximation.
pub fn to_decimal(value: f64) -> PaymentResult<Decimal> {
    if !value.is_finite() {
        return Err(PaymentError::processing(format!(
            "invalid monetary amount: {}",
            value
        )));
    }
    Decimal::from_str(&value.to_string())
        .map_err(|e| PaymentError::processing(format!("invalid monetary amount {}: {}", value, e)))
}

/// Round to cents, half away from zero, always keeping two fractional digits.
pub fn round_cents(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Render an amount the way the provider expects it: `10` -> `"10.00"`.
pub fn format_amount(value: f64) -> PaymentResult<String> {
    Ok(round_cents(to_decimal(value)?).to_string())
}

/// Render an item quantity as an integer string when it is integral.
pub fn format_quantity(quantity: &Number) -> String {
    if let Some(n) = quantity.as_u64() {
        return n.to_string();
    }
    if let Some(n) = quantity.as_i64() {
        return n.to_string();
    }
    match quantity.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => quantity.to_string(),
    }
}
