//! Payment gateway types and data structures
//!
//! Inbound checkout request, the PayPal order payload, and the shapes read back
//! from the provider.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Checkout request as submitted by the storefront.
///
/// Only deserialized after the presence checks in `validation` pass, so the
/// required fields are non-optional here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub total: f64,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub shipping: Option<f64>,
    #[serde(default)]
    pub tax: Option<f64>,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub price: f64,
    pub quantity: Number,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub email: String,
    pub phone: String,
}

impl ShippingAddress {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Order-creation body for `POST /v2/checkout/orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateOrderPayload {
    pub intent: String,
    pub purchase_units: Vec<PurchaseUnit>,
    pub application_context: ApplicationContext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseUnit {
    pub amount: Amount,
    pub items: Vec<PayloadItem>,
    pub shipping: Shipping,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Money {
    pub currency_code: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Amount {
    pub currency_code: String,
    pub value: String,
    pub breakdown: Breakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub item_total: Money,
    pub shipping: Money,
    pub tax_total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadItem {
    pub name: String,
    pub unit_amount: Money,
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shipping {
    pub name: ShippingName,
    pub address: ProviderAddress,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingName {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderAddress {
    pub address_line_1: String,
    pub admin_area_2: String,
    pub admin_area_1: String,
    pub postal_code: String,
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationContext {
    pub return_url: String,
    pub cancel_url: String,
}

/// Order as returned by the provider after creation.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderOrder {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub links: Vec<ProviderLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderLink {
    #[serde(default)]
    pub rel: String,
    #[serde(default)]
    pub href: Option<String>,
}

impl ProviderOrder {
    /// First `rel == "approve"` link with a usable href.
    pub fn approval_url(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == "approve")
            .and_then(|link| link.href.as_deref())
            .filter(|href| !href.is_empty())
    }
}

/// Outcome of a successful gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedOrder {
    pub order_id: String,
    pub approval_url: String,
    pub status: String,
    pub pending_token: String,
}

/// Success envelope returned to the storefront.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub success: bool,
    #[serde(flatten)]
    pub order: ApprovedOrder,
}

impl From<ApprovedOrder> for GatewayResponse {
    fn from(order: ApprovedOrder) -> Self {
        Self {
            success: true,
            order,
        }
    }
}
