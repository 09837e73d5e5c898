//! Request checks performed before any outbound call.

use serde_json::Value;

use crate::payments::error::{PaymentError, PaymentResult};
use crate::payments::money::to_decimal;

/// Fields every checkout request must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 3] = ["total", "items", "shippingAddress"];

/// Parse the raw body. Anything that is not JSON is rejected as a whole.
pub fn parse_body(body: &[u8]) -> PaymentResult<Value> {
    serde_json::from_slice(body).map_err(|_| PaymentError::InvalidJson)
}

/// A field counts as present only when it holds a meaningful value:
/// `null`, `false`, `0` and `""` are treated the same as an absent key.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

pub fn missing_fields(body: &Value) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !is_present(body.get(*field)))
        .collect()
}

/// Run the presence, total and items checks in order, stopping at the first
/// failure.
pub fn validate_order(body: &Value) -> PaymentResult<()> {
    let missing = missing_fields(body);
    if !missing.is_empty() {
        return Err(PaymentError::missing_fields(missing));
    }

    // Totals beyond the decimal range cannot be priced at all.
    match body.get("total").and_then(Value::as_f64) {
        Some(total) if total > 0.0 && to_decimal(total).is_ok() => {}
        _ => return Err(PaymentError::InvalidTotal),
    }

    match body.get("items").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => {}
        _ => return Err(PaymentError::EmptyItems),
    }

    Ok(())
}
