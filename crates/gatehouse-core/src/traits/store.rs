//! Ephemeral store trait for pluggable keyed-storage backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for ephemeral keyed storage (Redis in production, in-memory for
/// tests and single-node deployments).
///
/// One store instance backs sessions, lockout counters, token revocation
/// entries, and the permission cache; callers separate concerns with key
/// prefixes. All values are serialized as strings (JSON). Every operation
/// is atomic at single-key granularity; no multi-key transactions are
/// offered or required.
#[async_trait]
pub trait EphemeralStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Set a value only if the key does not already exist (NX).
    /// Returns `true` if the value was set, `false` if the key already existed.
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool>;

    /// Delete a key. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> AppResult<bool>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Increment an integer value by 1, creating it at 1 if absent.
    /// Returns the new value.
    async fn incr(&self, key: &str) -> AppResult<i64>;

    /// Set the TTL on an existing key. Returns `false` if the key is absent.
    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    /// Return the remaining TTL of a key, or `None` if the key is absent
    /// or carries no expiry.
    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>>;

    /// Return all keys starting with the given prefix.
    ///
    /// This is an O(keyspace) scan reserved for cold paths such as
    /// bulk session deletion; it must never run per-request.
    async fn scan_prefix(&self, prefix: &str) -> AppResult<Vec<String>>;

    /// Get a typed value by deserializing from JSON.
    async fn get_json<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> AppResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key).await? {
            Some(value) => {
                let parsed = serde_json::from_str(&value)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value by serializing to JSON.
    async fn set_json<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.set(key, &json, ttl).await
    }

    /// Check that the store backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
