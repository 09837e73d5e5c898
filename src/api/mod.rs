pub mod caller;
pub mod health;
pub mod orders;
pub mod payments;

use axum::{
    routing::{any, get, post},
    Router,
};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::checkout::{CheckoutService, InMemoryPendingOrderStore, PendingOrderStore};
use crate::config::Config;
use crate::database::{InMemoryOrderRepository, OrderRepository};
use crate::payments::payload::CheckoutUrls;
use crate::payments::providers::{PaypalConfig, PaypalProvider};
use crate::payments::PaymentGateway;
use crate::secrets::FileSecretStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<PaymentGateway>,
    pub checkout: Arc<CheckoutService>,
}

impl AppState {
    /// Wire the production collaborators: PayPal over HTTP, mounted secrets,
    /// process-local pending orders and order records.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let provider = PaypalProvider::new(PaypalConfig {
            base_url: config.paypal.base_url.clone(),
            timeout_secs: config.paypal.timeout_secs,
        })
        .context("Failed to initialize PayPal client")?;

        let pending: Arc<dyn PendingOrderStore> = Arc::new(InMemoryPendingOrderStore::new(
            Duration::from_secs(config.checkout.pending_ttl_secs),
        ));
        let orders: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::new());

        let gateway = PaymentGateway::new(
            Arc::new(provider),
            Arc::new(FileSecretStore::new(config.secrets.dir.clone())),
            pending.clone(),
            CheckoutUrls {
                default_origin: config.checkout.default_origin.clone(),
            },
        );

        Ok(Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
            checkout: Arc::new(CheckoutService::new(pending, orders)),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/payments/paypal/orders",
            any(payments::create_paypal_order),
        )
        .route(
            "/api/checkout/pending/:token/complete",
            post(payments::complete_pending_order),
        )
        .route("/api/orders", get(orders::list_orders))
        .route("/api/orders/:id", get(orders::get_order))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}
