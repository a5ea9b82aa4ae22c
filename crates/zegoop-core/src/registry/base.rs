//! Generic id-keyed registry shared by the provider and surface registries.

use dashmap::DashMap;
use std::sync::Arc;

use zegoop_protocols::ExtensionError;

/// Items stored in a [`BaseRegistry`].
pub trait Registerable: Send + Sync {
    fn registry_id(&self) -> &str;
}

/// Thread-safe map of id to shared item with duplicate checking.
pub struct BaseRegistry<T: ?Sized + Registerable> {
    items: DashMap<String, Arc<T>>,
}

impl<T: ?Sized + Registerable> BaseRegistry<T> {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Register an item. Fails if the id is taken.
    pub fn register(&self, item: Arc<T>) -> Result<(), ExtensionError> {
        let id = item.registry_id().to_string();

        if self.items.contains_key(&id) {
            return Err(ExtensionError::AlreadyRegistered(id));
        }

        self.items.insert(id, item);
        Ok(())
    }

    /// Remove an item. Fails if the id is unknown.
    pub fn unregister(&self, id: &str) -> Result<(), ExtensionError> {
        self.items
            .remove(id)
            .ok_or_else(|| ExtensionError::NotFound(id.to_string()))?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        self.items.get(id).map(|item| item.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn list_ids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of all items. Holds no shard lock once returned.
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.items.iter().map(|entry| entry.value().clone()).collect()
    }
}

impl<T: ?Sized + Registerable> Default for BaseRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
