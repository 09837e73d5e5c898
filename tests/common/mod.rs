//! Fake PayPal REST API for integration tests.
//!
//! Serves `/v1/oauth2/token` and `/v2/checkout/orders` on an ephemeral local
//! port and records every request it receives.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

pub const APPROVE_URL: &str = "https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T";
pub const ORDER_ID: &str = "5O190127TN364715T";
pub const ACCESS_TOKEN: &str = "A21AAFakeAccessToken";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone)]
pub struct FakeBehavior {
    pub token_status: StatusCode,
    pub token_body: Value,
    pub order_status: StatusCode,
    pub order_body: Value,
}

impl Default for FakeBehavior {
    fn default() -> Self {
        Self {
            token_status: StatusCode::OK,
            token_body: json!({
                "scope": "https://uri.paypal.com/services/payments/payment",
                "access_token": ACCESS_TOKEN,
                "token_type": "Bearer",
                "expires_in": 32400
            }),
            order_status: StatusCode::CREATED,
            order_body: json!({
                "id": ORDER_ID,
                "status": "CREATED",
                "links": [
                    {"href": format!("https://api.sandbox.paypal.com/v2/checkout/orders/{}", ORDER_ID), "rel": "self", "method": "GET"},
                    {"href": APPROVE_URL, "rel": "approve", "method": "GET"},
                    {"href": format!("https://api.sandbox.paypal.com/v2/checkout/orders/{}/capture", ORDER_ID), "rel": "capture", "method": "POST"}
                ]
            }),
        }
    }
}

#[derive(Clone)]
struct FakeState {
    behavior: FakeBehavior,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct FakePaypal {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakePaypal {
    pub async fn start(behavior: FakeBehavior) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            behavior,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v1/oauth2/token", post(token))
            .route("/v2/checkout/orders", post(create_order))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind fake PayPal listener");
        let addr = listener.local_addr().expect("listener has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake PayPal server failed");
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

fn record(state: &FakeState, path: &str, headers: &HeaderMap, body: &Bytes) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        path: path.to_string(),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: String::from_utf8_lossy(body).to_string(),
    });
}

async fn token(
    State(state): State<FakeState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    record(&state, "/v1/oauth2/token", &headers, &body);
    (
        state.behavior.token_status,
        Json(state.behavior.token_body.clone()),
    )
}

async fn create_order(
    State(state): State<FakeState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    record(&state, "/v2/checkout/orders", &headers, &body);
    (
        state.behavior.order_status,
        Json(state.behavior.order_body.clone()),
    )
}

pub fn checkout_body() -> Value {
    json!({
        "total": 100,
        "subtotal": 90,
        "shipping": 5,
        "tax": 5,
        "items": [
            {"name": "Merino Sweater", "price": 60, "quantity": 1},
            {"name": "Cotton Socks", "price": 15, "quantity": 2}
        ],
        "shippingAddress": {
            "firstName": "Ada",
            "lastName": "Lovelace",
            "address": "12 Analytical Way",
            "city": "Portland",
            "state": "OR",
            "zipCode": "97201",
            "email": "ada@example.com",
            "phone": "555-0100"
        },
        "returnUrl": "https://shop.example.com"
    })
}
