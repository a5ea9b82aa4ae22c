//! Volatile settings store.

use async_trait::async_trait;
use parking_lot::RwLock;

use zegoop_protocols::store::{select_keys, shallow_merge};
use zegoop_protocols::{SettingsMap, SettingsStore, StoreError};

/// Settings store that lives only as long as the process.
pub struct MemorySettingsStore {
    data: RwLock<SettingsMap>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(SettingsMap::new()),
        }
    }

    /// A store pre-filled with `data`.
    pub fn with_data(data: SettingsMap) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    fn id(&self) -> &str {
        "memory"
    }

    async fn get(&self, keys: Option<&[&str]>) -> Result<SettingsMap, StoreError> {
        Ok(select_keys(&self.data.read(), keys))
    }

    async fn set(&self, partial: SettingsMap) -> Result<(), StoreError> {
        shallow_merge(&mut self.data.write(), partial);
        Ok(())
    }
}
