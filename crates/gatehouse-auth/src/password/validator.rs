//! Password policy enforcement for new passwords.

use zxcvbn::Score;

use gatehouse_core::config::AuthConfig;
use gatehouse_core::error::AppError;

/// Validates password strength against configured policies.
///
/// The baseline policy is a minimum length plus upper/lower/digit
/// character classes. Deployments wanting more can additionally require
/// a minimum zxcvbn score via `password_min_score`.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
    /// Minimum zxcvbn score, when the entropy gate is enabled.
    min_score: Option<Score>,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            min_score: match config.password_min_score {
                0 => None,
                1 => Some(Score::One),
                2 => Some(Score::Two),
                3 => Some(Score::Three),
                _ => Some(Score::Four),
            },
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns `Ok(())` if the password meets all requirements,
    /// or an error describing the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.len() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::validation(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::validation(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }

        if let Some(min_score) = self.min_score {
            let estimate = zxcvbn::zxcvbn(password, &[]);
            if estimate.score() < min_score {
                return Err(AppError::validation(
                    "Password is too weak. Please use a stronger password with more entropy.",
                ));
            }
        }

        Ok(())
    }

    /// Validates that a new password differs from the old one.
    pub fn validate_not_same(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::error::ErrorKind;

    fn validator(min_score: u8) -> PasswordValidator {
        PasswordValidator::new(&AuthConfig {
            private_key_file: String::new(),
            public_key_file: String::new(),
            token_ttl_minutes: 60,
            password_min_length: 8,
            password_min_score: min_score,
            reset_token_ttl_minutes: 30,
        })
    }

    #[test]
    fn test_accepts_strong_password() {
        assert!(validator(0).validate("Quiet-Lantern-Optics-42").is_ok());
    }

    #[test]
    fn test_default_policy_accepts_class_compliant_password() {
        assert!(validator(0).validate("Passw0rd!").is_ok());
    }

    #[test]
    fn test_rejects_short_password() {
        let err = validator(0).validate("Ab1!").unwrap_err();
        assert!(err.is_kind(ErrorKind::Validation));
    }

    #[test]
    fn test_rejects_missing_digit() {
        let err = validator(0).validate("NoDigitsHereAtAll").unwrap_err();
        assert!(err.is_kind(ErrorKind::Validation));
    }

    #[test]
    fn test_entropy_gate_rejects_when_enabled() {
        // Meets the character classes but zxcvbn scores it poorly.
        let err = validator(3).validate("Password1").unwrap_err();
        assert!(err.is_kind(ErrorKind::Validation));
        assert!(validator(3).validate("Quiet-Lantern-Optics-42").is_ok());
    }

    #[test]
    fn test_rejects_reused_password() {
        let err = validator(0)
            .validate_not_same("Same-Pass-9", "Same-Pass-9")
            .unwrap_err();
        assert!(err.is_kind(ErrorKind::Validation));
    }
}
