//! RS256 token issuance and verification.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use gatehouse_core::config::AuthConfig;
use gatehouse_core::error::AppError;
use gatehouse_entity::user::User;

use super::claims::Claims;
use super::error::TokenError;

/// Issues and verifies RS256-signed tokens.
///
/// The manager is pure computation: it performs no I/O after
/// construction. Revocation is checked separately against the
/// ephemeral store by [`super::RevocationList`].
#[derive(Clone)]
pub struct TokenManager {
    /// RSA private key for signing.
    encoding_key: EncodingKey,
    /// RSA public key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration, pinned to RS256.
    validation: Validation,
    /// Token TTL in minutes.
    token_ttl_minutes: i64,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("validation", &self.validation)
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .finish()
    }
}

impl TokenManager {
    /// Creates a manager from PEM-encoded RSA keys.
    ///
    /// Accepts both PKCS#8 (`BEGIN PRIVATE KEY`) and PKCS#1
    /// (`BEGIN RSA PRIVATE KEY`) private keys.
    pub fn from_pem(
        private_pem: &[u8],
        public_pem: &[u8],
        token_ttl_minutes: u64,
    ) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| AppError::configuration(format!("Invalid RSA private key: {e}")))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| AppError::configuration(format!("Invalid RSA public key: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            token_ttl_minutes: token_ttl_minutes as i64,
        })
    }

    /// Creates a manager from auth configuration, reading the key
    /// files from disk.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        let private_pem = std::fs::read(&config.private_key_file).map_err(|e| {
            AppError::configuration(format!(
                "Failed to read private key '{}': {e}",
                config.private_key_file
            ))
        })?;
        let public_pem = std::fs::read(&config.public_key_file).map_err(|e| {
            AppError::configuration(format!(
                "Failed to read public key '{}': {e}",
                config.public_key_file
            ))
        })?;
        Self::from_pem(&private_pem, &public_pem, config.token_ttl_minutes)
    }

    /// Issues a signed token for a user and session.
    ///
    /// Roles and permissions are embedded as they stand right now.
    pub fn issue(
        &self,
        user: &User,
        session_id: &str,
        roles: Vec<String>,
        perms: Vec<String>,
    ) -> Result<(String, Claims), AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::minutes(self.token_ttl_minutes);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            sid: session_id.to_string(),
            roles,
            perms,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))?;

        Ok((token, claims))
    }

    /// Verifies a token and returns its claims.
    ///
    /// Checks the signature against the configured public key, the
    /// RS256 algorithm pin, and the `exp`/`nbf` time bounds. Does not
    /// consult the revocation list.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}
