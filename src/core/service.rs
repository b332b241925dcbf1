//! Service trait for data operations

use crate::core::entity::Entity;
use crate::core::store::EntityQuery;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Service trait for managing data entities
///
/// Implementations provide CRUD operations for a specific entity type.
/// Handlers are agnostic to the underlying storage mechanism.
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    /// Create a new entity
    async fn create(&self, entity: T) -> Result<T>;

    /// Get an entity by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// List all entities in insertion order
    async fn list(&self) -> Result<Vec<T>>;

    /// Start a composable query over the stored entities
    async fn query(&self) -> Result<EntityQuery<T>>;

    /// Update an existing entity
    async fn update(&self, id: &Uuid, entity: T) -> Result<T>;

    /// Delete an entity, returning whether it existed
    async fn delete(&self, id: &Uuid) -> Result<bool>;
}
