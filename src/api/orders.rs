use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::api::caller::CurrentUser;
use crate::api::AppState;
use crate::checkout::CheckoutError;

/// A single order, visible only to the user who placed it.
pub async fn get_order(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, CheckoutError> {
    let order = state.checkout.get_order(&id, &user_id).await?;
    Ok(Json(json!({ "success": true, "order": order })))
}

/// The caller's own orders, newest first.
pub async fn list_orders(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Value>, CheckoutError> {
    let orders = state.checkout.orders_for_user(&user_id).await?;
    Ok(Json(json!({ "success": true, "orders": orders })))
}
