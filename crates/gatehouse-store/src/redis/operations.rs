//! Redis ephemeral store implementation.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::EphemeralStore;

use super::client::RedisClient;

/// Redis-backed ephemeral store.
#[derive(Debug, Clone)]
pub struct RedisStore {
    /// Redis client.
    client: RedisClient,
}

impl RedisStore {
    /// Create a new Redis store.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        if e.is_timeout() {
            return AppError::with_source(ErrorKind::Timeout, format!("Redis timeout: {e}"), e);
        }
        AppError::with_source(ErrorKind::Store, format!("Redis error: {e}"), e)
    }

    /// Run a Redis command under the configured per-command deadline.
    async fn with_deadline<T, F>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = Result<T, redis::RedisError>> + Send,
    {
        match tokio::time::timeout(self.client.command_timeout(), fut).await {
            Ok(result) => result.map_err(Self::map_err),
            Err(_) => Err(AppError::timeout("Redis command exceeded its deadline")),
        }
    }
}

#[async_trait]
impl EphemeralStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        self.with_deadline(async move { conn.get(&full_key).await }).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let value = value.to_string();
        self.with_deadline(async move { conn.set_ex(&full_key, value, ttl.as_secs()).await })
            .await
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let value = value.to_string();

        // SET key value EX ttl NX
        let result: Option<String> = self
            .with_deadline(async move {
                redis::cmd("SET")
                    .arg(&full_key)
                    .arg(value)
                    .arg("EX")
                    .arg(ttl.as_secs())
                    .arg("NX")
                    .query_async(&mut conn)
                    .await
            })
            .await?;
        Ok(result.is_some())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let removed: i64 = self
            .with_deadline(async move { conn.del(&full_key).await })
            .await?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        self.with_deadline(async move { conn.exists(&full_key).await })
            .await
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        self.with_deadline(async move { conn.incr(&full_key, 1i64).await })
            .await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        self.with_deadline(async move { conn.expire(&full_key, ttl.as_secs() as i64).await })
            .await
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let seconds: i64 = self
            .with_deadline(async move { conn.ttl(&full_key).await })
            .await?;
        // -2 means the key is absent, -1 means it has no expiry.
        if seconds < 0 {
            return Ok(None);
        }
        Ok(Some(Duration::from_secs(seconds as u64)))
    }

    async fn scan_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
        let pattern = format!("{}*", self.client.prefixed_key(prefix));
        let strip = self.client.prefix().len();
        let mut conn = self.client.conn_mut();

        // Cursor-based SCAN so large keyspaces never block the server.
        let keys: Vec<String> = self
            .with_deadline(async move {
                let mut keys = Vec::new();
                let mut cursor: u64 = 0;
                loop {
                    let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(&pattern)
                        .arg("COUNT")
                        .arg(100)
                        .query_async(&mut conn)
                        .await?;
                    keys.extend(batch);
                    cursor = next;
                    if cursor == 0 {
                        break;
                    }
                }
                Ok(keys)
            })
            .await?;

        Ok(keys
            .into_iter()
            .filter_map(|key| key.get(strip..).map(str::to_string))
            .collect())
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = self
            .with_deadline(async move { redis::cmd("PING").query_async(&mut conn).await })
            .await?;
        Ok(pong == "PONG")
    }
}
