//! Session lifecycle manager.
//!
//! Sessions live only in the ephemeral store under `session:<id>` with
//! a TTL matching their expiry. There is no database table behind them:
//! losing the store logs everyone out.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use gatehouse_core::config::SessionConfig;
use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::EphemeralStore;
use gatehouse_entity::session::{SessionMetadata, SessionRecord};
use gatehouse_store::{StoreManager, keys};

/// Manages the session lifecycle: create, validate, extend, destroy.
#[derive(Debug, Clone)]
pub struct SessionManager {
    store: StoreManager,
    config: SessionConfig,
}

impl SessionManager {
    /// Create a new session manager.
    pub fn new(store: StoreManager, config: SessionConfig) -> Self {
        Self { store, config }
    }

    fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.config.ttl_minutes as i64)
    }

    /// Open a new session for a user.
    pub async fn create(
        &self,
        user_id: Uuid,
        metadata: SessionMetadata,
    ) -> AppResult<SessionRecord> {
        let session = SessionRecord::new(user_id, self.session_ttl(), metadata);
        self.write(&session).await?;
        info!(user_id = %user_id, session_id = %session.id, "Session created");
        Ok(session)
    }

    /// Load a session without touching it. Missing and expired both
    /// read as `None`.
    pub async fn get(&self, session_id: &str) -> AppResult<Option<SessionRecord>> {
        let record: Option<SessionRecord> =
            self.store.get_json(&keys::session(session_id)).await?;
        Ok(record.filter(|session| !session.is_expired()))
    }

    /// Validate a session and, when sliding expiry is enabled, push
    /// its expiry forward.
    ///
    /// Extension is forward-only: a session's expiry never moves
    /// earlier than it already is.
    pub async fn validate(&self, session_id: &str) -> AppResult<SessionRecord> {
        let mut session = self
            .get(session_id)
            .await?
            .ok_or_else(|| AppError::session("Session not found or expired"))?;

        session.touch();
        if self.config.sliding {
            session.extend(self.session_ttl());
        }
        self.write(&session).await?;

        Ok(session)
    }

    /// Destroy a session. Returns `true` if it existed.
    pub async fn destroy(&self, session_id: &str) -> AppResult<bool> {
        let existed = self.store.delete(&keys::session(session_id)).await?;
        if existed {
            debug!(session_id = %session_id, "Session destroyed");
        }
        Ok(existed)
    }

    /// Destroy every session belonging to a user. Returns the number
    /// destroyed.
    ///
    /// Walks the session namespace with a prefix scan; this is a cold
    /// path reserved for security events (role changes, password
    /// resets), never a per-request operation.
    pub async fn destroy_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let mut destroyed = 0u64;
        for key in self.store.scan_prefix(&keys::session_prefix()).await? {
            let record: Option<SessionRecord> = self.store.get_json(&key).await?;
            if let Some(session) = record {
                if session.user_id == user_id && self.store.delete(&key).await? {
                    destroyed += 1;
                }
            }
        }
        if destroyed > 0 {
            info!(user_id = %user_id, destroyed, "Destroyed all user sessions");
        }
        Ok(destroyed)
    }

    /// List a user's live sessions.
    pub async fn active_for_user(&self, user_id: Uuid) -> AppResult<Vec<SessionRecord>> {
        let mut sessions = Vec::new();
        for key in self.store.scan_prefix(&keys::session_prefix()).await? {
            let record: Option<SessionRecord> = self.store.get_json(&key).await?;
            if let Some(session) = record {
                if session.user_id == user_id && !session.is_expired() {
                    sessions.push(session);
                }
            }
        }
        Ok(sessions)
    }

    /// Persist a session with a store TTL matching its expiry.
    async fn write(&self, session: &SessionRecord) -> AppResult<()> {
        let remaining = (session.expires_at - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        self.store
            .set_json(&keys::session(&session.id), session, remaining)
            .await
    }
}
