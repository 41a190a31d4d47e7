//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in minutes from creation or last extension.
    #[serde(default = "default_ttl")]
    pub ttl_minutes: u64,
    /// Whether token validation slides the session expiry forward.
    #[serde(default = "default_true")]
    pub sliding: bool,
    /// TTL in seconds for cached permission sets.
    #[serde(default = "default_permission_ttl")]
    pub permission_cache_ttl_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl(),
            sliding: default_true(),
            permission_cache_ttl_seconds: default_permission_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    720
}

fn default_true() -> bool {
    true
}

fn default_permission_ttl() -> u64 {
    300
}
