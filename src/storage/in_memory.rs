//! In-memory implementation of DataService for testing and development

use crate::core::entity::Entity;
use crate::core::service::DataService;
use crate::core::store::EntityQuery;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory data service
///
/// Useful for testing and development. Uses RwLock for thread-safe access
/// and keeps entities in insertion order.
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    entities: Arc<RwLock<IndexMap<Uuid, T>>>,
}

impl<T> InMemoryDataService<T> {
    /// Create a new in-memory data service
    pub fn new() -> Self {
        Self {
            entities: Arc::new(RwLock::new(IndexMap::new())),
        }
    }
}

impl<T> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> InMemoryDataService<T> {
    /// Service pre-filled with `entities`
    pub fn with_entities(entities: impl IntoIterator<Item = T>) -> Self {
        let map = entities.into_iter().map(|e| (e.id(), e)).collect();
        Self {
            entities: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if entities.contains_key(&entity.id()) {
            return Err(anyhow!(
                "{} '{}' already exists",
                T::resource_name_singular(),
                entity.id()
            ));
        }
        entities.insert(entity.id(), entity.clone());

        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(entities.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(entities.values().cloned().collect())
    }

    async fn query(&self) -> Result<EntityQuery<T>> {
        Ok(EntityQuery::from_rows(self.list().await?))
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let slot = entities
            .get_mut(id)
            .ok_or_else(|| anyhow!("{} '{}' not found", T::resource_name_singular(), id))?;
        *slot = entity.clone();

        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(entities.shift_remove(id).is_some())
    }
}
