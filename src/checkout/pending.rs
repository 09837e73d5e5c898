//! Pending orders held between gateway success and the buyer's return from
//! PayPal.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::payments::types::OrderRequest;

#[derive(Debug, Error)]
pub enum PendingStoreError {
    #[error("Pending order {0} already exists")]
    Duplicate(Uuid),
}

pub type PendingResult<T> = Result<T, PendingStoreError>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub token: Uuid,
    pub provider_order_id: String,
    pub order: OrderRequest,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PendingOrder {
    pub fn new(provider_order_id: impl Into<String>, order: OrderRequest, ttl: Duration) -> Self {
        let created_at = Utc::now();
        let ttl = ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::days(36_500));
        Self {
            token: Uuid::new_v4(),
            provider_order_id: provider_order_id.into(),
            order,
            created_at,
            expires_at: created_at.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[async_trait]
pub trait PendingOrderStore: Send + Sync {
    /// Time-to-live applied to newly created pending orders
    fn ttl(&self) -> Duration;

    async fn insert(&self, order: PendingOrder) -> PendingResult<()>;

    /// Fetch a live pending order without consuming it
    async fn get(&self, token: &Uuid) -> PendingResult<Option<PendingOrder>>;

    /// Remove and return a live pending order
    async fn remove(&self, token: &Uuid) -> PendingResult<Option<PendingOrder>>;
}

pub const DEFAULT_PENDING_TTL: Duration = Duration::from_secs(3600);

/// Process-local pending-order store. Expired entries are never returned and
/// are dropped on the next insert.
pub struct InMemoryPendingOrderStore {
    ttl: Duration,
    orders: RwLock<HashMap<Uuid, PendingOrder>>,
}

impl InMemoryPendingOrderStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            orders: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

impl Default for InMemoryPendingOrderStore {
    fn default() -> Self {
        Self::new(DEFAULT_PENDING_TTL)
    }
}

#[async_trait]
impl PendingOrderStore for InMemoryPendingOrderStore {
    fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn insert(&self, order: PendingOrder) -> PendingResult<()> {
        let now = Utc::now();
        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|_, pending| !pending.is_expired(now));
        let swept = before - orders.len();
        if swept > 0 {
            debug!(swept, "Dropped expired pending orders");
        }
        if orders.contains_key(&order.token) {
            return Err(PendingStoreError::Duplicate(order.token));
        }
        orders.insert(order.token, order);
        Ok(())
    }

    async fn get(&self, token: &Uuid) -> PendingResult<Option<PendingOrder>> {
        let now = Utc::now();
        let orders = self.orders.read().await;
        Ok(orders
            .get(token)
            .filter(|pending| !pending.is_expired(now))
            .cloned())
    }

    async fn remove(&self, token: &Uuid) -> PendingResult<Option<PendingOrder>> {
        let now = Utc::now();
        let mut orders = self.orders.write().await;
        Ok(orders
            .remove(token)
            .filter(|pending| !pending.is_expired(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> OrderRequest {
        serde_json::from_value(serde_json::json!({
            "total": 20,
            "subtotal": 15,
            "shipping": 3,
            "tax": 2,
            "items": [{"name": "Scarf", "price": 15, "quantity": 1}],
            "shippingAddress": {"firstName": "Grace", "lastName": "Hopper"}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = InMemoryPendingOrderStore::default();
        let pending = PendingOrder::new("ORDER-1", sample_request(), store.ttl());
        let token = pending.token;

        store.insert(pending).await.unwrap();
        assert_eq!(
            store.get(&token).await.unwrap().unwrap().provider_order_id,
            "ORDER-1"
        );

        assert!(store.remove(&token).await.unwrap().is_some());
        assert!(store.get(&token).await.unwrap().is_none());
        assert!(store.remove(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_orders_are_invisible() {
        let store = InMemoryPendingOrderStore::new(Duration::ZERO);
        let pending = PendingOrder::new("ORDER-2", sample_request(), store.ttl());
        let token = pending.token;
        store.insert(pending).await.unwrap();

        assert!(store.get(&token).await.unwrap().is_none());
        assert!(store.remove(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_sweeps_expired_orders() {
        let store = InMemoryPendingOrderStore::new(Duration::ZERO);
        store
            .insert(PendingOrder::new("A", sample_request(), Duration::ZERO))
            .await
            .unwrap();
        store
            .insert(PendingOrder::new("B", sample_request(), Duration::from_secs(60)))
            .await
            .unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_live_token_is_never_overwritten() {
        let store = InMemoryPendingOrderStore::default();
        let first = PendingOrder::new("ORDER-1", sample_request(), store.ttl());
        let mut second = PendingOrder::new("ORDER-2", sample_request(), store.ttl());
        second.token = first.token;
        let token = first.token;

        store.insert(first).await.unwrap();
        let err = store.insert(second).await.unwrap_err();
        assert!(matches!(err, PendingStoreError::Duplicate(t) if t == token));
        assert_eq!(
            store.get(&token).await.unwrap().unwrap().provider_order_id,
            "ORDER-1"
        );
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = PendingOrder::new("X", sample_request(), DEFAULT_PENDING_TTL);
        let b = PendingOrder::new("X", sample_request(), DEFAULT_PENDING_TTL);
        assert_ne!(a.token, b.token);
    }
}
