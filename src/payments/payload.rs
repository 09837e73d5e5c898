//! Builds the PayPal order-creation payload from a validated checkout request.

use tracing::warn;

use crate::payments::error::{PaymentError, PaymentResult};
use crate::payments::money::{format_amount, format_quantity, round_cents, to_decimal};
use crate::payments::types::{
    Amount, ApplicationContext, Breakdown, CreateOrderPayload, Money, OrderRequest, PayloadItem,
    ProviderAddress, PurchaseUnit, Shipping, ShippingName,
};

pub const CURRENCY: &str = "USD";
pub const COUNTRY: &str = "US";
pub const INTENT: &str = "CAPTURE";
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";

const RETURN_PATH: &str = "/payment-success";
const CANCEL_PATH: &str = "/checkout";

/// Origin used when the request does not supply its own return/cancel URL.
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    pub default_origin: String,
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self {
            default_origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}

impl CheckoutUrls {
    pub fn return_url(&self, requested: Option<&str>) -> String {
        format!("{}{}", self.origin(requested), RETURN_PATH)
    }

    pub fn cancel_url(&self, requested: Option<&str>) -> String {
        format!("{}{}", self.origin(requested), CANCEL_PATH)
    }

    fn origin<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.default_origin)
    }
}

fn usd(value: f64) -> PaymentResult<Money> {
    Ok(Money {
        currency_code: CURRENCY.to_string(),
        value: format_amount(value)?,
    })
}

fn breakdown_amount(field: &str, value: Option<f64>) -> PaymentResult<f64> {
    value.ok_or_else(|| PaymentError::processing(format!("{} is required to build the order", field)))
}

pub fn build_order_payload(
    order: &OrderRequest,
    urls: &CheckoutUrls,
) -> PaymentResult<CreateOrderPayload> {
    let subtotal = breakdown_amount("subtotal", order.subtotal)?;
    let shipping = breakdown_amount("shipping", order.shipping)?;
    let tax = breakdown_amount("tax", order.tax)?;

    warn_on_inconsistent_total(order.total, subtotal, shipping, tax)?;

    let items = order
        .items
        .iter()
        .map(|item| {
            Ok(PayloadItem {
                name: item.name.clone(),
                unit_amount: usd(item.price)?,
                quantity: format_quantity(&item.quantity),
            })
        })
        .collect::<PaymentResult<Vec<_>>>()?;

    let address = &order.shipping_address;

    Ok(CreateOrderPayload {
        intent: INTENT.to_string(),
        purchase_units: vec![PurchaseUnit {
            amount: Amount {
                currency_code: CURRENCY.to_string(),
                value: format_amount(order.total)?,
                breakdown: Breakdown {
                    item_total: usd(subtotal)?,
                    shipping: usd(shipping)?,
                    tax_total: usd(tax)?,
                },
            },
            items,
            shipping: Shipping {
                name: ShippingName {
                    full_name: address.full_name(),
                },
                address: ProviderAddress {
                    address_line_1: address.address.clone(),
                    admin_area_2: address.city.clone(),
                    admin_area_1: address.state.clone(),
                    postal_code: address.zip_code.clone(),
                    country_code: COUNTRY.to_string(),
                },
            },
        }],
        application_context: ApplicationContext {
            return_url: urls.return_url(order.return_url.as_deref()),
            cancel_url: urls.cancel_url(order.cancel_url.as_deref()),
        },
    })
}

// Client totals are trusted as submitted; a mismatch is only surfaced in logs.
fn warn_on_inconsistent_total(total: f64, subtotal: f64, shipping: f64, tax: f64) -> PaymentResult<()> {
    let expected = round_cents(to_decimal(subtotal)? + to_decimal(shipping)? + to_decimal(tax)?);
    let submitted = round_cents(to_decimal(total)?);
    if expected != submitted {
        warn!(
            total = %submitted,
            breakdown_sum = %expected,
            "Order total does not match subtotal + shipping + tax"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(value: serde_json::Value) -> OrderRequest {
        serde_json::from_value(value).unwrap()
    }

    fn sample_order() -> OrderRequest {
        order(json!({
            "total": 100,
            "subtotal": 90,
            "shipping": 5,
            "tax": 5,
            "items": [
                {"name": "Linen Shirt", "price": 45, "quantity": 2},
            ],
            "shippingAddress": {
                "firstName": "Ada",
                "lastName": "Lovelace",
                "address": "12 Analytical Way",
                "city": "Portland",
                "state": "OR",
                "zipCode": "97201",
                "email": "ada@example.com",
                "phone": "555-0100"
            }
        }))
    }

    #[test]
    fn test_breakdown_values_have_two_decimals() {
        let payload = build_order_payload(&sample_order(), &CheckoutUrls::default()).unwrap();
        let amount = &payload.purchase_units[0].amount;
        assert_eq!(amount.value, "100.00");
        assert_eq!(amount.currency_code, "USD");
        assert_eq!(amount.breakdown.item_total.value, "90.00");
        assert_eq!(amount.breakdown.shipping.value, "5.00");
        assert_eq!(amount.breakdown.tax_total.value, "5.00");
    }

    #[test]
    fn test_items_and_shipping_mapping() {
        let payload = build_order_payload(&sample_order(), &CheckoutUrls::default()).unwrap();
        let unit = &payload.purchase_units[0];
        assert_eq!(payload.intent, "CAPTURE");
        assert_eq!(unit.items[0].name, "Linen Shirt");
        assert_eq!(unit.items[0].unit_amount.value, "45.00");
        assert_eq!(unit.items[0].quantity, "2");
        assert_eq!(unit.shipping.name.full_name, "Ada Lovelace");
        assert_eq!(unit.shipping.address.address_line_1, "12 Analytical Way");
        assert_eq!(unit.shipping.address.admin_area_2, "Portland");
        assert_eq!(unit.shipping.address.admin_area_1, "OR");
        assert_eq!(unit.shipping.address.postal_code, "97201");
        assert_eq!(unit.shipping.address.country_code, "US");
    }

    #[test]
    fn test_default_urls() {
        let payload = build_order_payload(&sample_order(), &CheckoutUrls::default()).unwrap();
        assert_eq!(
            payload.application_context.return_url,
            "http://localhost:5173/payment-success"
        );
        assert_eq!(
            payload.application_context.cancel_url,
            "http://localhost:5173/checkout"
        );
    }

    #[test]
    fn test_request_urls_override_default() {
        let mut request = sample_order();
        request.return_url = Some("https://shop.example.com".to_string());
        request.cancel_url = Some("https://shop.example.com/store".to_string());
        let payload = build_order_payload(&request, &CheckoutUrls::default()).unwrap();
        assert_eq!(
            payload.application_context.return_url,
            "https://shop.example.com/payment-success"
        );
        assert_eq!(
            payload.application_context.cancel_url,
            "https://shop.example.com/store/checkout"
        );
    }

    #[test]
    fn test_missing_breakdown_field_is_processing_fault() {
        let mut request = sample_order();
        request.tax = None;
        let err = build_order_payload(&request, &CheckoutUrls::default()).unwrap_err();
        assert!(matches!(err, PaymentError::Processing { .. }));
        assert_eq!(
            err.to_string(),
            "Payment processing failed: tax is required to build the order"
        );
    }

    #[test]
    fn test_payload_serializes_provider_field_names() {
        let payload = build_order_payload(&sample_order(), &CheckoutUrls::default()).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["purchase_units"][0]["amount"]["breakdown"]["tax_total"]["value"], "5.00");
        assert_eq!(value["purchase_units"][0]["items"][0]["unit_amount"]["currency_code"], "USD");
        assert_eq!(value["application_context"]["return_url"], "http://localhost:5173/payment-success");
    }
}
