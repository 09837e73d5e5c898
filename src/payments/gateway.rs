//! Payment gateway adapter
//!
//! Turns one storefront checkout request into one PayPal order and hands back
//! the approval URL. Each call fetches its own credential and token; nothing
//! provider-related is shared between calls.

use http::Method;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::checkout::pending::{PendingOrder, PendingOrderStore};
use crate::payments::error::{PaymentError, PaymentResult};
use crate::payments::payload::{build_order_payload, CheckoutUrls};
use crate::payments::traits::PaymentProvider;
use crate::payments::types::{ApprovedOrder, OrderRequest};
use crate::payments::validation::{parse_body, validate_order};
use crate::secrets::{SecretStore, PAYPAL_API_KEY};

pub struct PaymentGateway {
    provider: Arc<dyn PaymentProvider>,
    secrets: Arc<dyn SecretStore>,
    pending: Arc<dyn PendingOrderStore>,
    urls: CheckoutUrls,
}

impl PaymentGateway {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        secrets: Arc<dyn SecretStore>,
        pending: Arc<dyn PendingOrderStore>,
        urls: CheckoutUrls,
    ) -> Self {
        Self {
            provider,
            secrets,
            pending,
            urls,
        }
    }

    pub fn secrets(&self) -> &Arc<dyn SecretStore> {
        &self.secrets
    }

    /// Name of the secret holding the provider API key
    pub fn secret_name(&self) -> &'static str {
        PAYPAL_API_KEY
    }

    /// Handle one checkout request end to end.
    ///
    /// The method is checked before the body is touched. Validation failures
    /// never reach the provider; a token failure never reaches order creation.
    #[instrument(skip(self, body), fields(provider = self.provider.name()))]
    pub async fn create_order(&self, method: &Method, body: &[u8]) -> PaymentResult<ApprovedOrder> {
        if *method != Method::POST {
            return Err(PaymentError::MethodNotAllowed);
        }

        let raw = parse_body(body)?;
        validate_order(&raw)?;

        let api_key = self
            .secrets
            .get_secret(PAYPAL_API_KEY)
            .await?
            .ok_or_else(|| {
                warn!(secret = PAYPAL_API_KEY, "Provider API key is not configured");
                PaymentError::NotConfigured
            })?;

        let access_token = self.provider.access_token(&api_key).await?;

        let order: OrderRequest = serde_json::from_value(raw)
            .map_err(|e| PaymentError::processing(e.to_string()))?;
        let payload = build_order_payload(&order, &self.urls)?;

        let provider_order = self.provider.create_order(&access_token, &payload).await?;

        let approval_url = provider_order
            .approval_url()
            .ok_or_else(|| {
                warn!(order_id = %provider_order.id, "Provider response has no approve link");
                PaymentError::ApprovalUrlMissing
            })?
            .to_string();

        let pending = PendingOrder::new(provider_order.id.clone(), order, self.pending.ttl());
        let pending_token = pending.token;
        self.pending.insert(pending).await?;

        info!(
            order_id = %provider_order.id,
            status = %provider_order.status,
            %pending_token,
            "Checkout order awaiting buyer approval"
        );

        Ok(ApprovedOrder {
            order_id: provider_order.id,
            approval_url,
            status: provider_order.status,
            pending_token: pending_token.to_string(),
        })
    }
}
