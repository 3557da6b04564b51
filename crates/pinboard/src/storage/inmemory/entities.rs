//! In-memory entity registry.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use pinboard_core::pins::EntityRef;
use pinboard_core::storage::{EntityResolver, Result};

/// Set of known entities, answering existence checks for pinned references.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityRegistry {
    entities: Arc<RwLock<HashSet<EntityRef>>>,
}

impl InMemoryEntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity. Returns false if it was already known.
    pub async fn insert(&self, entity: EntityRef) -> bool {
        self.entities.write().await.insert(entity)
    }

    /// Forgets an entity. Returns false if it was unknown.
    pub async fn remove(&self, entity: &EntityRef) -> bool {
        self.entities.write().await.remove(entity)
    }
}

#[async_trait]
impl EntityResolver for InMemoryEntityRegistry {
    async fn entity_exists(&self, entity: EntityRef) -> Result<bool> {
        Ok(self.entities.read().await.contains(&entity))
    }
}
