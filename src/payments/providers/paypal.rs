//! PayPal payment provider implementation
//!
//! Client-credentials token exchange and order creation against PayPal's
//! REST API. No retries: a failed call is reported to the caller as-is.

use crate::payments::error::{PaymentError, PaymentResult};
use crate::payments::traits::PaymentProvider;
use crate::payments::types::{CreateOrderPayload, ProviderOrder};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info, warn};

pub const SANDBOX_BASE_URL: &str = "https://api-m.sandbox.paypal.com";

const TOKEN_PATH: &str = "/v1/oauth2/token";
const ORDERS_PATH: &str = "/v2/checkout/orders";

/// PayPal provider configuration
#[derive(Debug, Clone)]
pub struct PaypalConfig {
    /// REST API base URL (defaults to the sandbox)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PaypalConfig {
    fn default() -> Self {
        Self {
            base_url: SANDBOX_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// PayPal payment provider
pub struct PaypalProvider {
    config: PaypalConfig,
    client: Client,
}

impl PaypalProvider {
    /// Create a new PayPal provider instance
    pub fn new(config: PaypalConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                PaymentError::processing(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

/// `Basic` credentials for the client-credentials grant: the API key as user,
/// empty password.
pub fn basic_auth_header(api_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:", api_key)))
}

/// Read an error body as loose JSON. Anything unreadable or non-JSON
/// becomes `null`, so every field lookup on it comes back empty.
async fn error_body(response: Response) -> Value {
    match response.text().await {
        Ok(text) => serde_json::from_str(&text).unwrap_or(Value::Null),
        Err(_) => Value::Null,
    }
}

/// A string field of an error body; empty strings count as absent.
fn text_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// The `details` array of an error body, or nothing when it is not an array.
fn details_field(body: &Value) -> Vec<Value> {
    body.get("details")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[async_trait]
impl PaymentProvider for PaypalProvider {
    fn name(&self) -> &'static str {
        "PayPal"
    }

    async fn access_token(&self, api_key: &str) -> PaymentResult<String> {
        let response = self
            .client
            .post(self.url(TOKEN_PATH))
            .header(AUTHORIZATION, basic_auth_header(api_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            warn!(
                status = status.as_u16(),
                error = text_field(&body, "error").as_deref().unwrap_or("unknown"),
                "PayPal token exchange rejected"
            );
            return Err(PaymentError::authentication(text_field(
                &body,
                "error_description",
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            error!("Failed to parse PayPal token response: {}", e);
            PaymentError::processing(format!("Invalid token response: {}", e))
        })?;

        info!(expires_in = ?token.expires_in, "PayPal access token obtained");
        Ok(token.access_token)
    }

    async fn create_order(
        &self,
        access_token: &str,
        payload: &CreateOrderPayload,
    ) -> PaymentResult<ProviderOrder> {
        let response = self
            .client
            .post(self.url(ORDERS_PATH))
            .bearer_auth(access_token)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            warn!(
                status = status.as_u16(),
                name = text_field(&body, "name").as_deref().unwrap_or("unknown"),
                debug_id = text_field(&body, "debug_id").as_deref().unwrap_or("-"),
                "PayPal order creation rejected"
            );
            return Err(PaymentError::order_creation(
                text_field(&body, "message"),
                details_field(&body),
            ));
        }

        let order: ProviderOrder = response.json().await.map_err(|e| {
            error!("Failed to parse PayPal order response: {}", e);
            PaymentError::processing(format!("Invalid order response: {}", e))
        })?;

        info!(order_id = %order.id, status = %order.status, "PayPal order created");
        Ok(order)
    }
}

// Token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}
