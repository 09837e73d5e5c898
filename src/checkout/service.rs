//! Completes a checkout once the buyer returns from PayPal.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::checkout::pending::{PendingOrder, PendingOrderStore, PendingStoreError};
use crate::database::order_repository::{order_number, OrderRecord, OrderRepository, OrderStatus};
use crate::database::DatabaseError;
use crate::payments::money::{round_cents, to_decimal};
use crate::payments::PaymentError;

pub const PAYMENT_METHOD: &str = "PayPal";

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Pending order not found or expired.")]
    PendingNotFound,

    #[error("Pending order does not match the approved payment.")]
    OrderMismatch,

    #[error("Order not found.")]
    OrderNotFound,

    #[error("Authentication required.")]
    Unauthenticated,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Order could not be saved: {0}")]
    Storage(String),
}

impl CheckoutError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckoutError::PendingNotFound | CheckoutError::OrderNotFound => StatusCode::NOT_FOUND,
            CheckoutError::OrderMismatch => StatusCode::CONFLICT,
            CheckoutError::Unauthenticated => StatusCode::UNAUTHORIZED,
            CheckoutError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CheckoutError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CheckoutError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.to_string(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<DatabaseError> for CheckoutError {
    fn from(err: DatabaseError) -> Self {
        CheckoutError::Storage(err.to_string())
    }
}

impl From<PendingStoreError> for CheckoutError {
    fn from(err: PendingStoreError) -> Self {
        CheckoutError::Storage(err.to_string())
    }
}

impl From<PaymentError> for CheckoutError {
    fn from(err: PaymentError) -> Self {
        CheckoutError::InvalidRequest(err.to_string())
    }
}

pub struct CheckoutService {
    pending: Arc<dyn PendingOrderStore>,
    orders: Arc<dyn OrderRepository>,
}

impl CheckoutService {
    pub fn new(pending: Arc<dyn PendingOrderStore>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { pending, orders }
    }

    /// Redeem a pending order and persist it as a placed order.
    ///
    /// The pending record is consumed only when `provider_order_id` matches
    /// the PayPal order it was created for.
    pub async fn complete(
        &self,
        token: &str,
        provider_order_id: &str,
        user_id: Option<String>,
    ) -> Result<OrderRecord, CheckoutError> {
        let token = Uuid::parse_str(token).map_err(|_| CheckoutError::PendingNotFound)?;

        let pending = self
            .pending
            .get(&token)
            .await?
            .ok_or(CheckoutError::PendingNotFound)?;

        if pending.provider_order_id != provider_order_id {
            warn!(
                %token,
                expected = %pending.provider_order_id,
                received = %provider_order_id,
                "Pending order redeemed with a different PayPal order"
            );
            return Err(CheckoutError::OrderMismatch);
        }

        // A concurrent redemption may have consumed it since the lookup.
        let pending = self
            .pending
            .remove(&token)
            .await?
            .ok_or(CheckoutError::PendingNotFound)?;

        let record = build_record(pending, user_id)?;
        let saved = self.orders.insert(&record).await.map_err(|e| {
            if e.is_constraint_violation() {
                warn!(order_number = %record.order_number, "Order record collided with an existing one");
            }
            e.with_context(format!("pending order {}", token))
        })?;

        info!(
            order_id = %saved.id,
            order_number = %saved.order_number,
            transaction_id = saved.transaction_id.as_deref().unwrap_or("-"),
            "Order placed"
        );
        Ok(saved)
    }

    /// Fetch an order on behalf of `user_id`. Orders owned by someone else
    /// (or by nobody) are reported as not found.
    pub async fn get_order(&self, id: &str, user_id: &str) -> Result<OrderRecord, CheckoutError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(CheckoutError::OrderNotFound)?;

        if order.user_id.as_deref() != Some(user_id) {
            warn!(order_id = %id, "Order requested by a user who does not own it");
            return Err(CheckoutError::OrderNotFound);
        }
        Ok(order)
    }

    pub async fn orders_for_user(&self, user_id: &str) -> Result<Vec<OrderRecord>, CheckoutError> {
        Ok(self.orders.find_by_user(user_id).await?)
    }
}

fn build_record(pending: PendingOrder, user_id: Option<String>) -> Result<OrderRecord, PaymentError> {
    let order = pending.order;
    let amount = |value: Option<f64>| -> Result<_, PaymentError> {
        Ok(round_cents(to_decimal(value.unwrap_or_default())?))
    };
    let created_at = Utc::now();

    Ok(OrderRecord {
        id: Uuid::new_v4(),
        order_number: order_number(created_at),
        user_id,
        subtotal: amount(order.subtotal)?,
        shipping: amount(order.shipping)?,
        tax: amount(order.tax)?,
        total: amount(Some(order.total))?,
        items: order.items,
        shipping_address: order.shipping_address,
        status: OrderStatus::Processing,
        payment_method: PAYMENT_METHOD.to_string(),
        transaction_id: Some(pending.provider_order_id),
        created_at,
    })
}
