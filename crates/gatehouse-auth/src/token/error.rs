//! Token verification errors.

use thiserror::Error;

use gatehouse_core::error::AppError;

/// Why a token failed verification.
///
/// Callers that only need pass/fail can convert into [`AppError`]; the
/// distinct variants exist so logs and tests can tell the cases apart.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token is past its expiration.
    #[error("Token has expired")]
    Expired,
    /// The token is not structurally a valid JWT.
    #[error("Token is malformed")]
    Malformed,
    /// The signature does not verify against the configured public key.
    #[error("Token signature is invalid")]
    SignatureInvalid,
    /// The token was signed with an algorithm other than RS256.
    #[error("Token uses an unexpected algorithm")]
    UnexpectedAlgorithm,
    /// Any other verification failure.
    #[error("Token verification failed: {0}")]
    Verification(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::SignatureInvalid,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Self::UnexpectedAlgorithm
            }
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::Malformed,
            _ => Self::Verification(err.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::authentication(err.to_string())
    }
}
