//! Token revocation list backed by the ephemeral store.
//!
//! Revocation entries live exactly as long as the token they revoke
//! could still be presented, so the list never grows past the set of
//! live tokens.

use std::time::Duration;

use gatehouse_core::result::AppResult;
use gatehouse_core::traits::EphemeralStore;
use gatehouse_store::{StoreManager, keys};

/// Minimum revocation TTL, covering clock skew near expiry.
const MIN_REVOCATION_TTL: Duration = Duration::from_secs(60);

/// Tracks revoked token IDs.
#[derive(Debug, Clone)]
pub struct RevocationList {
    store: StoreManager,
}

impl RevocationList {
    /// Create a new revocation list over the given store.
    pub fn new(store: StoreManager) -> Self {
        Self { store }
    }

    /// Revoke a token ID for the remainder of its lifetime.
    pub async fn revoke(&self, jti: &str, remaining_ttl: Duration) -> AppResult<()> {
        let ttl = remaining_ttl.max(MIN_REVOCATION_TTL);
        self.store
            .set(&keys::revoked_token(jti), "revoked", ttl)
            .await
    }

    /// Check whether a token ID has been revoked.
    pub async fn is_revoked(&self, jti: &str) -> AppResult<bool> {
        self.store.exists(&keys::revoked_token(jti)).await
    }
}
