//! Key builders for every Gatehouse store entry.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses. The Redis backend applies
//! its configured deployment prefix on top of these.

use uuid::Uuid;

// ── Session keys ───────────────────────────────────────────

/// Store key for a session record by ID.
pub fn session(session_id: &str) -> String {
    format!("session:{session_id}")
}

/// Prefix covering every session record, for bulk scans.
pub fn session_prefix() -> String {
    "session:".to_string()
}

// ── Lockout keys ───────────────────────────────────────────

/// Store key for the failed-login counter of an email.
pub fn login_attempts(email: &str) -> String {
    format!("ratelimit:login:{}", email.to_lowercase())
}

/// Store key marking an email as locked out.
pub fn login_lock(email: &str) -> String {
    format!("ratelimit:locked:{}", email.to_lowercase())
}

// ── Permission cache keys ──────────────────────────────────

/// Store key for the cached permission set of a user.
pub fn user_permissions(user_id: Uuid) -> String {
    format!("perms:{user_id}")
}

// ── Token keys ─────────────────────────────────────────────

/// Store key for a revoked token, by JWT ID.
pub fn revoked_token(jti: &str) -> String {
    format!("revoked:{jti}")
}

/// Store key for a pending password reset, by token digest.
pub fn password_reset(token_digest: &str) -> String {
    format!("pwreset:{token_digest}")
}
