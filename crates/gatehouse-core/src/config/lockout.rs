//! Brute-force lockout configuration.

use serde::{Deserialize, Serialize};

/// Failed-login tracking and account lockout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockoutConfig {
    /// Consecutive failures within the window that trigger a lockout.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: i64,
    /// Sliding window in minutes over which failures are counted.
    #[serde(default = "default_window")]
    pub attempt_window_minutes: u64,
    /// Lockout duration in minutes once the threshold is reached.
    #[serde(default = "default_lockout")]
    pub lockout_duration_minutes: u64,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: default_max_failed(),
            attempt_window_minutes: default_window(),
            lockout_duration_minutes: default_lockout(),
        }
    }
}

fn default_max_failed() -> i64 {
    5
}

fn default_window() -> u64 {
    15
}

fn default_lockout() -> u64 {
    30
}
