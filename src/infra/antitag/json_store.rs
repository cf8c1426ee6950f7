use crate::core::antitag::{AntitagAction, ModerationPolicy, PolicyStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Policies kept in a JSON file, `{ "<group id>": { "enabled": true, "action": "kick" } }`.
///
/// The whole map is cached and rewritten on every change.
pub struct JsonPolicyStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, ModerationPolicy>>,
}

impl JsonPolicyStore {
    pub fn new(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let map = if path.exists() {
            let file = std::fs::File::open(&path)?;
            serde_json::from_reader(file).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable antitag policy file {:?}: {}", path, e);
                HashMap::new()
            })
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(map),
        })
    }

    /// Write `policies` to a sibling temp file and rename it over the store.
    ///
    /// Callers hold the cache write guard, so writers never interleave.
    async fn persist(
        &self,
        policies: &HashMap<String, ModerationPolicy>,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(policies)
            .map_err(|e| StoreError::StorageError(e.to_string()))?;

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");

        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))
    }
}

#[async_trait]
impl PolicyStore for JsonPolicyStore {
    async fn get_policy(&self, group_id: &str) -> Result<Option<ModerationPolicy>, StoreError> {
        let cache = self.cache.read().await;
        Ok(cache.get(group_id).copied())
    }

    async fn set_policy(&self, group_id: &str, action: AntitagAction) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        cache.insert(group_id.to_string(), ModerationPolicy::enabled(action));
        self.persist(&cache).await
    }

    async fn remove_policy(&self, group_id: &str) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        if cache.remove(group_id).is_none() {
            return Ok(());
        }

        self.persist(&cache).await
    }
}
