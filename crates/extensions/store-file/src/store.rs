//! JSON file store implementation.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use zegoop_protocols::store::{select_keys, shallow_merge};
use zegoop_protocols::{SettingsMap, SettingsStore, StoreError};

use crate::error::FileStoreError;

/// Settings store persisted to a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    cache: RwLock<SettingsMap>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating the parent directory if needed.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, FileStoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| FileStoreError::CreateDirFailed {
                        path: parent.to_path_buf(),
                        reason: e.to_string(),
                    })?;
                info!("Created settings directory: {:?}", parent);
            }
        }

        let data = Self::load(&path).await?;
        info!("Opened settings store {:?} ({} keys)", path, data.len());

        Ok(Self {
            path,
            cache: RwLock::new(data),
        })
    }

    /// Open the store at `~/.zegoop/settings.json`.
    pub async fn default_path() -> Result<Self, FileStoreError> {
        let home = dirs::home_dir().ok_or(FileStoreError::StoragePathNotSet)?;
        Self::new(home.join(".zegoop").join("settings.json")).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(path: &Path) -> Result<SettingsMap, FileStoreError> {
        if !path.exists() {
            return Ok(SettingsMap::new());
        }

        let content = fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            return Ok(SettingsMap::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(FileStoreError::Corrupt {
                path: path.to_path_buf(),
                reason: "top level is not an object".to_string(),
            }),
            Err(e) => Err(FileStoreError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    async fn persist(&self, data: &SettingsMap) -> Result<(), FileStoreError> {
        let mut bytes = serde_json::to_vec_pretty(data).map_err(|e| FileStoreError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        bytes.push(b'\n');

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!("Persisted settings to {:?}", self.path);
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    fn id(&self) -> &str {
        "json-file"
    }

    async fn get(&self, keys: Option<&[&str]>) -> Result<SettingsMap, StoreError> {
        let cache = self.cache.read().await;
        Ok(select_keys(&cache, keys))
    }

    async fn set(&self, partial: SettingsMap) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        let mut next = cache.clone();
        shallow_merge(&mut next, partial);

        // The cache only moves forward once the file is on disk.
        self.persist(&next).await?;
        *cache = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
