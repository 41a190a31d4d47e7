//! Token claims embedded in every issued token.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims payload of a Gatehouse access token.
///
/// Roles and permissions are snapshots taken at issuance. A token does
/// not observe later RBAC changes; revocation and session destruction
/// are the mechanisms that cut off stale grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user ID.
    pub sub: Uuid,
    /// Email of the user at issuance.
    pub email: String,
    /// Session ID this token belongs to.
    pub sid: String,
    /// Role names at issuance.
    pub roles: Vec<String>,
    /// Permission names at issuance.
    pub perms: Vec<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Not-before timestamp (seconds since epoch).
    pub nbf: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token ID for revocation tracking.
    pub jti: String,
}

impl Claims {
    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Returns the remaining lifetime in seconds (0 if expired).
    pub fn remaining_ttl_seconds(&self) -> u64 {
        let remaining = self.exp - Utc::now().timestamp();
        if remaining > 0 { remaining as u64 } else { 0 }
    }

    /// Checks whether a permission name was granted at issuance.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.perms.iter().any(|p| p == permission)
    }
}
