use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::api::caller::CurrentUser;
use crate::api::AppState;
use crate::checkout::CheckoutError;
use crate::payments::types::GatewayResponse;

/// Gateway entry point. Registered for every method so that non-POST
/// requests get the JSON 405 envelope instead of the router's default.
pub async fn create_paypal_order(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    // An unreadable body is reported the same way as an unparseable one.
    let body = body.unwrap_or_default();

    match state.gateway.create_order(&method, &body).await {
        Ok(order) => (StatusCode::OK, Json(GatewayResponse::from(order))).into_response(),
        Err(err) => {
            if err.is_client_error() {
                info!(status = err.status_code().as_u16(), "Checkout request rejected: {}", err);
            } else {
                error!(status = err.status_code().as_u16(), "Checkout failed: {}", err);
            }
            err.into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePendingRequest {
    /// PayPal order id, as appended to the return URL by PayPal (`token`)
    pub order_id: String,
}

pub async fn complete_pending_order(
    State(state): State<AppState>,
    Path(token): Path<String>,
    user: Option<CurrentUser>,
    payload: Result<Json<CompletePendingRequest>, JsonRejection>,
) -> Result<Response, CheckoutError> {
    let Json(request) = payload.map_err(|e| CheckoutError::InvalidRequest(e.body_text()))?;

    let order = state
        .checkout
        .complete(&token, &request.order_id, user.map(|CurrentUser(id)| id))
        .await?;

    Ok((StatusCode::OK, Json(json!({ "success": true, "order": order }))).into_response())
}
