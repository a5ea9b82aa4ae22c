//! Settings store protocol.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::settings::SettingsMap;

/// Persisted key/value settings record.
///
/// `set` merges at top-level key granularity only: a nested object in
/// `partial` replaces the stored one wholesale. Callers that want to update
/// one nested field must read, merge and write the whole nested object.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the store ID.
    fn id(&self) -> &str;

    /// Read the given top-level keys, or the whole record for `None`.
    async fn get(&self, keys: Option<&[&str]>) -> Result<SettingsMap, StoreError>;

    /// Shallow-merge `partial` into the record.
    async fn set(&self, partial: SettingsMap) -> Result<(), StoreError>;
}

/// Merge `partial` into `target`, replacing whole values per key.
pub fn shallow_merge(target: &mut SettingsMap, partial: SettingsMap) {
    for (key, value) in partial {
        target.insert(key, value);
    }
}

/// Copy the requested keys out of `source`; absent keys are skipped.
pub fn select_keys(source: &SettingsMap, keys: Option<&[&str]>) -> SettingsMap {
    match keys {
        None => source.clone(),
        Some(keys) => keys
            .iter()
            .filter_map(|key| source.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect(),
    }
}
