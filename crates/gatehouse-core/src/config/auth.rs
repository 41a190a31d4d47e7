//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Credential and token configuration.
///
/// The RSA key pair is provisioned externally; the paths point at PEM
/// files read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path to the RSA private key (PEM) used for token signing.
    pub private_key_file: String,
    /// Path to the RSA public key (PEM) used for token verification.
    pub public_key_file: String,
    /// Token lifetime in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Minimum zxcvbn strength score (0-4) for new passwords.
    ///
    /// Zero disables the entropy gate, leaving length and character
    /// classes as the whole policy.
    #[serde(default = "default_password_min_score")]
    pub password_min_score: u8,
    /// Password reset token lifetime in minutes.
    #[serde(default = "default_reset_ttl")]
    pub reset_token_ttl_minutes: u64,
}

fn default_token_ttl() -> u64 {
    60
}

fn default_password_min() -> usize {
    8
}

fn default_password_min_score() -> u8 {
    0
}

fn default_reset_ttl() -> u64 {
    30
}
