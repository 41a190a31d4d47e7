//! Brute-force failed-login tracking and lockout.
//!
//! Counters are keyed by lowercased email, not by user id, so unknown
//! emails are throttled exactly like real accounts and the login
//! endpoint cannot be used to probe which addresses exist.
//!
//! The guard owns the store mechanics only: counting failures, setting
//! and reading lock keys. When to lock, and what the caller sees, is
//! decided by `AuthService`.

use std::time::Duration;

use tracing::debug;

use gatehouse_core::config::LockoutConfig;
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::EphemeralStore;
use gatehouse_store::{StoreManager, keys};

/// Tracks failed logins and enforces temporary lockouts.
#[derive(Debug, Clone)]
pub struct LockoutGuard {
    store: StoreManager,
    config: LockoutConfig,
}

impl LockoutGuard {
    /// Create a new guard over the given store.
    pub fn new(store: StoreManager, config: LockoutConfig) -> Self {
        Self { store, config }
    }

    /// Configured failure threshold.
    pub fn max_failed_attempts(&self) -> i64 {
        self.config.max_failed_attempts
    }

    fn window(&self) -> Duration {
        Duration::from_secs(self.config.attempt_window_minutes * 60)
    }

    fn lockout(&self) -> Duration {
        Duration::from_secs(self.config.lockout_duration_minutes * 60)
    }

    /// Return the remaining lockout duration for an email, if locked.
    pub async fn locked_for(&self, email: &str) -> AppResult<Option<Duration>> {
        let key = keys::login_lock(email);
        if !self.store.exists(&key).await? {
            return Ok(None);
        }
        // A lock key with no TTL still counts as locked.
        Ok(Some(
            self.store.ttl(&key).await?.unwrap_or_else(|| self.lockout()),
        ))
    }

    /// Record a failed login attempt, returning the failure count in
    /// the current window.
    ///
    /// The first failure in a window starts the window TTL.
    pub async fn record_failure(&self, email: &str) -> AppResult<i64> {
        let counter_key = keys::login_attempts(email);
        let attempts = self.store.incr(&counter_key).await?;
        if attempts == 1 {
            self.store.expire(&counter_key, self.window()).await?;
        }
        Ok(attempts)
    }

    /// Lock an email out for the configured duration and reset its
    /// failure counter.
    pub async fn lock(&self, email: &str) -> AppResult<()> {
        self.store
            .set(&keys::login_lock(email), "locked", self.lockout())
            .await?;
        self.store.delete(&keys::login_attempts(email)).await?;
        debug!("Lockout recorded");
        Ok(())
    }

    /// Clear the failure counter after a successful login.
    ///
    /// Does not clear an active lock; only expiry ends a lockout.
    pub async fn clear(&self, email: &str) -> AppResult<()> {
        self.store.delete(&keys::login_attempts(email)).await?;
        Ok(())
    }
}
