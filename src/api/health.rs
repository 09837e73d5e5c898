use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub paypal_configured: bool,
}

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let version = env!("CARGO_PKG_VERSION").to_string();

    let paypal_configured = match state
        .gateway
        .secrets()
        .get_secret(state.gateway.secret_name())
        .await
    {
        Ok(secret) => secret.is_some(),
        Err(e) => {
            warn!("Secret store check failed: {}", e);
            false
        }
    };

    let response = HealthResponse {
        status: "healthy".to_string(),
        version,
        environment: state.config.server.environment.clone(),
        paypal_configured,
    };

    Ok(Json(response))
}
