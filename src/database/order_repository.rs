use crate::database::error::{DatabaseError, DatabaseErrorKind};
use crate::database::repository::Repository;
use crate::payments::types::{OrderItem, ShippingAddress};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Page size used when listing a user's orders
pub const USER_ORDERS_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Order entity as persisted in the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Option<String>,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub shipping_address: ShippingAddress,
    pub status: OrderStatus,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Human-facing order number: `VO` followed by the last eight digits of the
/// creation time in epoch milliseconds.
pub fn order_number(created_at: DateTime<Utc>) -> String {
    format!("VO{:08}", created_at.timestamp_millis().rem_euclid(100_000_000))
}

impl OrderRecord {
    fn validate(&self) -> Result<(), DatabaseError> {
        if self.items.is_empty() {
            return Err(DatabaseError::new(DatabaseErrorKind::InvalidRecord {
                message: "order must contain at least one item".to_string(),
            }));
        }
        if self.total <= Decimal::ZERO {
            return Err(DatabaseError::new(DatabaseErrorKind::InvalidRecord {
                message: format!("order total must be positive, got {}", self.total),
            }));
        }
        Ok(())
    }
}

/// Order-specific queries on top of the base repository
#[async_trait]
pub trait OrderRepository: Repository<Entity = OrderRecord> {
    /// Orders belonging to a user, newest first, at most `USER_ORDERS_LIMIT`
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<OrderRecord>, DatabaseError>;
}

/// Process-local order repository
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, OrderRecord>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn parse_id(id: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(id).map_err(|e| {
        DatabaseError::new(DatabaseErrorKind::InvalidRecord {
            message: format!("Invalid UUID: {}", e),
        })
    })
}

#[async_trait]
impl Repository for InMemoryOrderRepository {
    type Entity = OrderRecord;

    async fn find_by_id(&self, id: &str) -> Result<Option<Self::Entity>, DatabaseError> {
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.orders.read().await.get(&uuid).cloned())
    }

    async fn insert(&self, entity: &Self::Entity) -> Result<Self::Entity, DatabaseError> {
        entity.validate()?;
        let mut orders = self.orders.write().await;
        if orders.contains_key(&entity.id) {
            return Err(DatabaseError::duplicate("id", entity.id.to_string()));
        }
        if orders
            .values()
            .any(|existing| existing.order_number == entity.order_number)
        {
            return Err(DatabaseError::duplicate("order_number", &entity.order_number));
        }
        orders.insert(entity.id, entity.clone());
        Ok(entity.clone())
    }

    async fn update(&self, id: &str, entity: &Self::Entity) -> Result<Self::Entity, DatabaseError> {
        let uuid = parse_id(id)?;
        entity.validate()?;
        let mut orders = self.orders.write().await;
        match orders.get_mut(&uuid) {
            Some(existing) => {
                let mut updated = entity.clone();
                updated.id = uuid;
                *existing = updated.clone();
                Ok(updated)
            }
            None => Err(DatabaseError::not_found("Order", id)),
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<OrderRecord>, DatabaseError> {
        let mut orders: Vec<OrderRecord> = self
            .orders
            .read()
            .await
            .values()
            .filter(|order| order.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(USER_ORDERS_LIMIT);
        Ok(orders)
    }
}
