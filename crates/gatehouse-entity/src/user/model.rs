//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login email (stored lowercase).
    pub email: String,
    /// Argon2id password hash. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Whether the account may log in at all.
    pub is_active: bool,
    /// Administrative lock flag.
    pub is_locked: bool,
    /// Account locked until this time (if locked).
    pub locked_until: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check whether the account is locked right now.
    ///
    /// An expired `locked_until` no longer counts as locked even if the
    /// flag was left set.
    pub fn is_locked_now(&self) -> bool {
        if let Some(until) = self.locked_until {
            return Utc::now() < until;
        }
        self.is_locked
    }

    /// Check whether the account can authenticate right now.
    pub fn can_login(&self) -> bool {
        self.is_active && !self.is_locked_now()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Login email.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Display name.
    pub display_name: String,
}
