use crate::database::error::DatabaseError;
use async_trait::async_trait;

/// Base repository trait over a structured record store
/// Mirrors the operations the remote store exposes: create, fetch by id,
/// update by id
#[async_trait]
pub trait Repository: Send + Sync {
    /// Associated type for the entity this repository manages
    type Entity: Send + Sync;

    /// Find an entity by its ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Self::Entity>, DatabaseError>;

    /// Insert a new entity
    async fn insert(&self, entity: &Self::Entity) -> Result<Self::Entity, DatabaseError>;

    /// Update an existing entity
    async fn update(&self, id: &str, entity: &Self::Entity) -> Result<Self::Entity, DatabaseError>;

    /// Check if an entity exists by ID
    async fn exists(&self, id: &str) -> Result<bool, DatabaseError> {
        match self.find_by_id(id).await {
            Ok(Some(_)) => Ok(true),
            Ok(None) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
