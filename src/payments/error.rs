use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

pub type PaymentResult<T> = Result<T, PaymentError>;

/// Failures the gateway can report to its caller.
///
/// Every variant maps to exactly one HTTP status and renders into the
/// `{ "success": false, "error": ... }` envelope.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Method not allowed. Only POST requests are accepted.")]
    MethodNotAllowed,

    #[error("Invalid JSON in request body.")]
    InvalidJson,

    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },

    #[error("Invalid total amount. Must be a positive number.")]
    InvalidTotal,

    #[error("Order must contain at least one item.")]
    EmptyItems,

    #[error("PayPal API key not configured. Please contact support.")]
    NotConfigured,

    #[error("PayPal authentication failed: {description}")]
    Authentication { description: String },

    #[error("PayPal order creation failed: {message}")]
    OrderCreation { message: String, details: Vec<Value> },

    #[error("PayPal approval URL not found in response.")]
    ApprovalUrlMissing,

    #[error("Payment processing failed: {message}")]
    Processing { message: String },
}

impl PaymentError {
    pub fn missing_fields(fields: Vec<&'static str>) -> Self {
        Self::MissingFields { fields }
    }

    pub fn authentication(description: Option<String>) -> Self {
        Self::Authentication {
            description: description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "Unknown error".to_string()),
        }
    }

    pub fn order_creation(message: Option<String>, details: Vec<Value>) -> Self {
        Self::OrderCreation {
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Unknown error".to_string()),
            details,
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PaymentError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            PaymentError::InvalidJson
            | PaymentError::MissingFields { .. }
            | PaymentError::InvalidTotal
            | PaymentError::EmptyItems
            | PaymentError::OrderCreation { .. } => StatusCode::BAD_REQUEST,
            PaymentError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            PaymentError::ApprovalUrlMissing => StatusCode::BAD_GATEWAY,
            PaymentError::NotConfigured | PaymentError::Processing { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// True for failures caused by the request itself rather than the
    /// provider or the deployment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PaymentError::MethodNotAllowed
                | PaymentError::InvalidJson
                | PaymentError::MissingFields { .. }
                | PaymentError::InvalidTotal
                | PaymentError::EmptyItems
        )
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.to_string(),
        });
        if let PaymentError::OrderCreation { details, .. } = self {
            body["details"] = Value::Array(details.clone());
        }
        body
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        PaymentError::processing(err.to_string())
    }
}

impl From<crate::secrets::SecretError> for PaymentError {
    fn from(err: crate::secrets::SecretError) -> Self {
        PaymentError::processing(err.to_string())
    }
}

impl From<crate::checkout::pending::PendingStoreError> for PaymentError {
    fn from(err: crate::checkout::pending::PendingStoreError) -> Self {
        PaymentError::processing(err.to_string())
    }
}
