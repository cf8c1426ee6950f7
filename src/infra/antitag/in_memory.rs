// In-memory PolicyStore. Nothing survives a restart; used for tests and
// throwaway runs (`ANTITAG_POLICY_BACKEND=memory`).

use crate::core::antitag::{AntitagAction, ModerationPolicy, PolicyStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;

/// Maps group id -> policy.
///
/// DashMap keeps concurrent detections and admin commands from needing a Mutex.
#[derive(Default)]
pub struct InMemoryPolicyStore {
    policies: DashMap<String, ModerationPolicy>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn get_policy(&self, group_id: &str) -> Result<Option<ModerationPolicy>, StoreError> {
        Ok(self.policies.get(group_id).map(|entry| *entry))
    }

    async fn set_policy(&self, group_id: &str, action: AntitagAction) -> Result<(), StoreError> {
        self.policies
            .insert(group_id.to_string(), ModerationPolicy::enabled(action));
        Ok(())
    }

    async fn remove_policy(&self, group_id: &str) -> Result<(), StoreError> {
        self.policies.remove(group_id);
        Ok(())
    }
}
