//! Single-use password reset tokens.
//!
//! The plaintext token is handed to the caller (for delivery out of
//! band) and only its SHA-256 digest is stored, so a store dump never
//! exposes usable tokens.

use std::time::Duration;

use rand::RngExt;
use rand::distr::Alphanumeric;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use gatehouse_core::result::AppResult;
use gatehouse_core::traits::EphemeralStore;
use gatehouse_store::{StoreManager, keys};

/// Length of generated reset tokens.
const RESET_TOKEN_LENGTH: usize = 48;

/// Issues and consumes password reset tokens.
#[derive(Debug, Clone)]
pub struct ResetTokenIssuer {
    store: StoreManager,
    token_ttl: Duration,
}

impl ResetTokenIssuer {
    /// Create a new issuer writing to the given store.
    pub fn new(store: StoreManager, token_ttl: Duration) -> Self {
        Self { store, token_ttl }
    }

    /// Issue a reset token for a user, replacing any outstanding one
    /// under the same digest namespace.
    ///
    /// Returns the plaintext token. Only its digest is stored.
    pub async fn issue(&self, user_id: Uuid) -> AppResult<String> {
        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(RESET_TOKEN_LENGTH)
            .map(char::from)
            .collect();

        let key = keys::password_reset(&sha256_hex(&token));
        self.store
            .set(&key, &user_id.to_string(), self.token_ttl)
            .await?;

        Ok(token)
    }

    /// Look up the user a token was issued for without consuming it.
    ///
    /// Callers that may still reject the reset (for example on password
    /// policy grounds) check with `peek` first and consume only once
    /// the replacement is acceptable.
    pub async fn peek(&self, token: &str) -> AppResult<Option<Uuid>> {
        let key = keys::password_reset(&sha256_hex(token));
        let Some(value) = self.store.get(&key).await? else {
            return Ok(None);
        };
        Ok(Uuid::parse_str(&value).ok())
    }

    /// Consume a reset token, returning the user it was issued for.
    ///
    /// The token is deleted before the user id is returned, so it can
    /// be used at most once even under concurrent attempts.
    pub async fn consume(&self, token: &str) -> AppResult<Option<Uuid>> {
        let key = keys::password_reset(&sha256_hex(token));
        let Some(value) = self.store.get(&key).await? else {
            return Ok(None);
        };
        if !self.store.delete(&key).await? {
            // Another consumer won the race.
            return Ok(None);
        }
        Ok(Uuid::parse_str(&value).ok())
    }
}

/// Hex-encoded SHA-256 digest of the input.
fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gatehouse_core::config::store::MemoryStoreConfig;
    use gatehouse_store::memory::MemoryStore;

    fn issuer() -> ResetTokenIssuer {
        let store = StoreManager::from_backend(Arc::new(MemoryStore::new(&MemoryStoreConfig {
            max_capacity: 1000,
        })));
        ResetTokenIssuer::new(store, Duration::from_secs(60))
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_issue_and_consume_once() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();
        let token = issuer.issue(user_id).await.unwrap();
        assert_eq!(token.len(), RESET_TOKEN_LENGTH);

        let consumed = issuer.consume(&token).await.unwrap();
        assert_eq!(consumed, Some(user_id));

        // Second use fails.
        assert_eq!(issuer.consume(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_peek_does_not_consume() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();
        let token = issuer.issue(user_id).await.unwrap();

        assert_eq!(issuer.peek(&token).await.unwrap(), Some(user_id));
        assert_eq!(issuer.peek(&token).await.unwrap(), Some(user_id));
        assert_eq!(issuer.consume(&token).await.unwrap(), Some(user_id));
        assert_eq!(issuer.peek(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let issuer = issuer();
        assert_eq!(issuer.consume("no-such-token").await.unwrap(), None);
    }
}
