//! Payment provider trait definitions
//!
//! The seam between the gateway and the payment processor's REST API.

use crate::payments::error::PaymentResult;
use crate::payments::types::{CreateOrderPayload, ProviderOrder};
use async_trait::async_trait;

/// Trait for payment provider implementations
///
/// The gateway calls `access_token` and then `create_order`, strictly in that
/// order, once per checkout.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &'static str;

    /// Exchange the stored API key for a short-lived access token
    ///
    /// # Errors
    /// * `PaymentError::Authentication` when the provider rejects the credential
    async fn access_token(&self, api_key: &str) -> PaymentResult<String>;

    /// Create a payment order
    ///
    /// # Errors
    /// * `PaymentError::OrderCreation` when the provider rejects the order,
    ///   carrying the provider's message and structured details
    async fn create_order(
        &self,
        access_token: &str,
        payload: &CreateOrderPayload,
    ) -> PaymentResult<ProviderOrder>;
}
