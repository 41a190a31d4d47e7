//! Cached permission sets, keyed by user.
//!
//! Entries are JSON arrays of permission names under `perms:<user_id>`.
//! The cache is advisory: a miss falls through to the database, and
//! every RBAC mutation invalidates the affected users explicitly.

use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use gatehouse_core::result::AppResult;
use gatehouse_core::traits::EphemeralStore;
use gatehouse_store::{StoreManager, keys};

/// Cache of resolved permission names per user.
#[derive(Debug, Clone)]
pub struct PermissionCache {
    store: StoreManager,
    ttl: Duration,
}

impl PermissionCache {
    /// Create a new cache over the given store.
    pub fn new(store: StoreManager, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Look up the cached permission set for a user.
    pub async fn get(&self, user_id: Uuid) -> AppResult<Option<Vec<String>>> {
        self.store.get_json(&keys::user_permissions(user_id)).await
    }

    /// Store the resolved permission set for a user.
    pub async fn put(&self, user_id: Uuid, permissions: &[String]) -> AppResult<()> {
        self.store
            .set_json(&keys::user_permissions(user_id), &permissions, self.ttl)
            .await
    }

    /// Drop the cached entry for a user. Returns `true` if one existed.
    pub async fn invalidate(&self, user_id: Uuid) -> AppResult<bool> {
        let existed = self.store.delete(&keys::user_permissions(user_id)).await?;
        if existed {
            debug!(user_id = %user_id, "Invalidated permission cache");
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gatehouse_core::config::store::MemoryStoreConfig;
    use gatehouse_store::memory::MemoryStore;

    fn cache() -> PermissionCache {
        let store = StoreManager::from_backend(Arc::new(MemoryStore::new(&MemoryStoreConfig {
            max_capacity: 1000,
        })));
        PermissionCache::new(store, Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_put_get_invalidate() {
        let cache = cache();
        let user_id = Uuid::new_v4();
        assert_eq!(cache.get(user_id).await.unwrap(), None);

        let perms = vec!["billing:read".to_string(), "users:read".to_string()];
        cache.put(user_id, &perms).await.unwrap();
        assert_eq!(cache.get(user_id).await.unwrap(), Some(perms));

        assert!(cache.invalidate(user_id).await.unwrap());
        assert_eq!(cache.get(user_id).await.unwrap(), None);
        assert!(!cache.invalidate(user_id).await.unwrap());
    }
}
