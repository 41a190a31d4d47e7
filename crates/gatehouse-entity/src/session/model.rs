//! Session record stored in the ephemeral store.
//!
//! Sessions are never persisted to the database. Losing the store
//! logs everyone out, which is the accepted failure mode.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client context captured at login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Remote address the session was opened from.
    pub ip_address: Option<String>,
    /// User agent string of the client.
    pub user_agent: Option<String>,
}

/// An authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque session identifier (UUIDv4).
    pub id: String,
    /// Owner of the session.
    pub user_id: Uuid,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
    /// Last time the session was used.
    pub last_activity: DateTime<Utc>,
    /// Client context captured at login.
    pub metadata: SessionMetadata,
}

impl SessionRecord {
    /// Open a new session for `user_id` valid for `ttl`.
    pub fn new(user_id: Uuid, ttl: Duration, metadata: SessionMetadata) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
            last_activity: now,
            metadata,
        }
    }

    /// Whether the session has passed its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Slide the expiry forward to `now + ttl`.
    ///
    /// Extension is forward-only: if the current expiry is already
    /// further out, it is kept.
    pub fn extend(&mut self, ttl: Duration) {
        let candidate = Utc::now() + ttl;
        if candidate > self.expires_at {
            self.expires_at = candidate;
        }
    }

    /// Record activity on the session.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_is_forward_only() {
        let mut session =
            SessionRecord::new(Uuid::new_v4(), Duration::hours(12), SessionMetadata::default());
        let original = session.expires_at;
        session.extend(Duration::hours(1));
        assert_eq!(session.expires_at, original);
        session.extend(Duration::hours(24));
        assert!(session.expires_at > original);
    }

    #[test]
    fn test_new_session_is_not_expired() {
        let session =
            SessionRecord::new(Uuid::new_v4(), Duration::hours(1), SessionMetadata::default());
        assert!(!session.is_expired());
        assert!(Uuid::parse_str(&session.id).is_ok());
    }
}
