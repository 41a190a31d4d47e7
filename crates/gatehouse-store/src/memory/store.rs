//! In-memory store implementation using dashmap.
//!
//! Entries carry their own expiry so TTL semantics match the Redis
//! backend: expired keys read as absent, `incr` creates missing
//! counters at 1, `expire` and `ttl` operate per key.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use tracing::debug;

use gatehouse_core::config::store::MemoryStoreConfig;
use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::EphemeralStore;

/// A stored value with optional expiry.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn with_ttl(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Some(Instant::now() + ttl),
        }
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-memory ephemeral store with per-entry expiry.
///
/// Expired entries are dropped lazily on access and swept when the map
/// reaches its configured capacity.
#[derive(Debug)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
    max_capacity: u64,
}

impl MemoryStore {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryStoreConfig) -> Self {
        Self {
            entries: DashMap::new(),
            max_capacity: config.max_capacity,
        }
    }

    /// Remove every expired entry. Called when the map is at capacity.
    fn sweep_expired(&self) {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, "Swept expired store entries");
        }
    }

    fn insert(&self, key: &str, entry: Entry) {
        if self.entries.len() as u64 >= self.max_capacity && !self.entries.contains_key(key) {
            self.sweep_expired();
        }
        self.entries.insert(key.to_string(), entry);
    }
}

#[async_trait]
impl EphemeralStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired_at(now) {
                return Ok(Some(entry.value.clone()));
            }
        }
        self.entries
            .remove_if(key, |_, entry| entry.is_expired_at(now));
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.insert(key, Entry::with_ttl(value.to_string(), ttl));
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            MapEntry::Occupied(mut occupied) => {
                if occupied.get().is_expired_at(now) {
                    occupied.insert(Entry::with_ttl(value.to_string(), ttl));
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(Entry::with_ttl(value.to_string(), ttl));
                Ok(true)
            }
        }
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let now = Instant::now();
        match self.entries.remove(key) {
            Some((_, entry)) => Ok(!entry.is_expired_at(now)),
            None => Ok(false),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        let now = Instant::now();
        let mut entry = self.entries.entry(key.to_string()).or_insert(Entry {
            value: "0".to_string(),
            expires_at: None,
        });
        if entry.is_expired_at(now) {
            *entry = Entry {
                value: "0".to_string(),
                expires_at: None,
            };
        }
        let current: i64 = entry.value.parse().map_err(|_| {
            AppError::new(
                ErrorKind::Store,
                format!("Value at '{key}' is not an integer"),
            )
        })?;
        let next = current + 1;
        entry.value = next.to_string();
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let now = Instant::now();
        match self.entries.get_mut(key) {
            Some(mut entry) if !entry.is_expired_at(now) => {
                entry.expires_at = Some(now + ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired_at(now) {
                return Ok(entry.expires_at.map(|at| at - now));
            }
        }
        Ok(None)
    }

    async fn scan_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
        let now = Instant::now();
        let keys: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix) && !entry.value().is_expired_at(now))
            .map(|entry| entry.key().clone())
            .collect();
        Ok(keys)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
