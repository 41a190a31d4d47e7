//! The `AuthService` facade: registration, login, token validation,
//! logout, and password flows.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use gatehouse_core::error::AppError;
use gatehouse_core::events::AuditEvent;
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::AuditSink;
use gatehouse_entity::repository::UserRepository;
use gatehouse_entity::session::{SessionMetadata, SessionRecord};
use gatehouse_entity::user::{NewUser, User};

use crate::lockout::LockoutGuard;
use crate::password::{PasswordHasher, PasswordValidator, ResetTokenIssuer};
use crate::rbac::RbacService;
use crate::session::SessionManager;
use crate::token::{Claims, RevocationList, TokenManager};

/// Role assigned to every newly registered user, when present.
const DEFAULT_ROLE: &str = "member";

/// Error message for any credential failure at login.
///
/// Unknown email, wrong password, and disabled account all surface the
/// same message so the endpoint cannot be used to probe accounts.
const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Result of a successful login or token validation.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The signed access token.
    pub token: String,
    /// Claims embedded in the token.
    pub claims: Claims,
    /// The backing session.
    pub session: SessionRecord,
    /// The authenticated user.
    pub user: User,
}

/// Orchestrates authentication end to end.
#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    rbac: RbacService,
    tokens: Arc<TokenManager>,
    sessions: SessionManager,
    lockout: LockoutGuard,
    revocation: RevocationList,
    reset: ResetTokenIssuer,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish()
    }
}

impl AuthService {
    /// Create a new auth service with all required dependencies.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        rbac: RbacService,
        tokens: Arc<TokenManager>,
        sessions: SessionManager,
        lockout: LockoutGuard,
        revocation: RevocationList,
        reset: ResetTokenIssuer,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            user_repo,
            rbac,
            tokens,
            sessions,
            lockout,
            revocation,
            reset,
            hasher,
            validator,
            audit,
        }
    }

    /// Access the RBAC service.
    pub fn rbac(&self) -> &RbacService {
        &self.rbac
    }

    /// Access the session manager.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    // ── Registration ───────────────────────────────────────

    /// Register a new user account.
    ///
    /// Validates the email shape and password policy, stores the
    /// Argon2id hash, and assigns the default role when it exists.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<User> {
        if !email.validate_email() {
            return Err(AppError::validation("Invalid email address"));
        }
        if display_name.trim().is_empty() {
            return Err(AppError::validation("Display name must not be empty"));
        }
        self.validator.validate(password)?;

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .user_repo
            .create(NewUser {
                email: email.to_lowercase(),
                password_hash,
                display_name: display_name.to_string(),
            })
            .await?;

        if let Some(role) = self.rbac.find_role_by_name(DEFAULT_ROLE).await? {
            self.rbac.assign_role(user.id, role.id).await?;
        }

        info!(user_id = %user.id, "User registered");
        self.audit
            .record(AuditEvent::UserRegistered {
                user_id: user.id,
                email: user.email.clone(),
            })
            .await;
        Ok(user)
    }

    // ── Login / logout ─────────────────────────────────────

    /// Authenticate a user and open a session.
    ///
    /// The lockout check runs before any credential work, so a locked
    /// email is rejected even when the password is correct.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        metadata: SessionMetadata,
    ) -> AppResult<AuthSession> {
        if let Some(remaining) = self.lockout.locked_for(email).await? {
            return Err(AppError::locked(format!(
                "Account is temporarily locked. Try again in {} minutes",
                remaining.as_secs().div_ceil(60).max(1)
            )));
        }

        let Some(user) = self.user_repo.find_by_email(email).await? else {
            // Unknown emails are throttled like real ones.
            self.handle_failed_login(email, &metadata).await?;
            return Err(AppError::authentication(BAD_CREDENTIALS));
        };

        if !user.is_active {
            warn!(user_id = %user.id, "Login attempt on disabled account");
            return Err(AppError::authentication(BAD_CREDENTIALS));
        }
        if user.is_locked_now() {
            return Err(AppError::locked("Account is locked"));
        }

        if !self.hasher.verify_password(password, &user.password_hash)? {
            self.handle_failed_login(email, &metadata).await?;
            return Err(AppError::authentication(BAD_CREDENTIALS));
        }

        self.lockout.clear(email).await?;

        let access = self
            .rbac
            .user_access(user.id)
            .await?
            .ok_or_else(|| AppError::internal("User disappeared during login"))?;

        let session = self.sessions.create(user.id, metadata.clone()).await?;
        self.rbac.prime_cache(&access).await?;

        let (token, claims) = self.tokens.issue(
            &user,
            &session.id,
            access.role_names(),
            access.permission_names(),
        )?;

        info!(user_id = %user.id, session_id = %session.id, "Login succeeded");
        self.audit
            .record(AuditEvent::LoginSucceeded {
                user_id: user.id,
                email: user.email.clone(),
                ip: metadata.ip_address.clone(),
            })
            .await;

        Ok(AuthSession {
            token,
            claims,
            session,
            user,
        })
    }

    /// Validate a presented token.
    ///
    /// Checks signature and time bounds, then revocation, then the
    /// backing session. Validating extends the session when sliding
    /// expiry is enabled; the token's own expiry never moves.
    pub async fn validate_token(&self, token: &str) -> AppResult<(Claims, SessionRecord)> {
        let claims = self.tokens.verify(token)?;

        if self.revocation.is_revoked(&claims.jti).await? {
            return Err(AppError::authentication("Token has been revoked"));
        }

        let session = self.sessions.validate(&claims.sid).await?;
        Ok((claims, session))
    }

    /// Log out: revoke the token and destroy its session.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        let claims = self.tokens.verify(token)?;

        self.revocation
            .revoke(
                &claims.jti,
                Duration::from_secs(claims.remaining_ttl_seconds()),
            )
            .await?;
        self.sessions.destroy(&claims.sid).await?;

        info!(user_id = %claims.sub, session_id = %claims.sid, "Logged out");
        self.audit
            .record(AuditEvent::Logout {
                user_id: claims.sub,
                session_id: claims.sid.clone(),
            })
            .await;
        Ok(())
    }

    // ── Account administration ─────────────────────────────

    /// Lock or unlock a user account administratively.
    ///
    /// Locking destroys every session of the user so existing tokens
    /// stop validating at the next session check. Passing `None` lifts
    /// the lock.
    pub async fn set_user_lock(
        &self,
        user_id: Uuid,
        until: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;

        self.user_repo.set_locked_until(user_id, until).await?;

        if until.is_some() {
            self.sessions.destroy_all_for_user(user_id).await?;
            warn!(user_id = %user_id, "Account locked by administrator");
            self.audit
                .record(AuditEvent::AccountLocked {
                    email: user.email.clone(),
                })
                .await;
        } else {
            info!(user_id = %user_id, "Account lock lifted");
        }
        Ok(())
    }

    // ── Password flows ─────────────────────────────────────

    /// Start a password reset.
    ///
    /// Returns the plaintext reset token for out-of-band delivery, or
    /// `None` when the email is unknown. Callers must respond
    /// identically in both cases.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<Option<String>> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            return Ok(None);
        };

        let token = self.reset.issue(user.id).await?;
        self.audit
            .record(AuditEvent::PasswordResetRequested { user_id: user.id })
            .await;
        Ok(Some(token))
    }

    /// Complete a password reset with a token from
    /// [`Self::request_password_reset`].
    ///
    /// The token is consumed only once the replacement password passes
    /// policy, so a rejected password leaves the token usable for a
    /// retry. Replacing the password destroys every session of the
    /// user.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()> {
        if self.reset.peek(token).await?.is_none() {
            return Err(AppError::authentication("Invalid or expired reset token"));
        }
        self.validator.validate(new_password)?;

        // The delete inside `consume` keeps the token single-use even
        // when two resets race past the peek.
        let Some(user_id) = self.reset.consume(token).await? else {
            return Err(AppError::authentication("Invalid or expired reset token"));
        };

        let password_hash = self.hasher.hash_password(new_password)?;
        self.user_repo.update_password(user_id, &password_hash).await?;
        self.sessions.destroy_all_for_user(user_id).await?;

        info!(user_id = %user_id, "Password reset completed");
        self.audit
            .record(AuditEvent::PasswordChanged { user_id })
            .await;
        Ok(())
    }

    /// Change a password for an authenticated user.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;

        if !self
            .hasher
            .verify_password(current_password, &user.password_hash)?
        {
            return Err(AppError::authentication("Current password is incorrect"));
        }

        self.validator
            .validate_not_same(current_password, new_password)?;
        self.validator.validate(new_password)?;

        let password_hash = self.hasher.hash_password(new_password)?;
        self.user_repo.update_password(user_id, &password_hash).await?;
        self.sessions.destroy_all_for_user(user_id).await?;

        self.audit
            .record(AuditEvent::PasswordChanged { user_id })
            .await;
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────

    async fn handle_failed_login(
        &self,
        email: &str,
        metadata: &SessionMetadata,
    ) -> AppResult<()> {
        let attempts = self.lockout.record_failure(email).await?;
        self.audit
            .record(AuditEvent::LoginFailed {
                email: email.to_lowercase(),
                ip: metadata.ip_address.clone(),
            })
            .await;
        if attempts >= self.lockout.max_failed_attempts() {
            self.lockout.lock(email).await?;
            warn!(email = %email.to_lowercase(), attempts, "Account locked out");
            self.audit
                .record(AuditEvent::AccountLocked {
                    email: email.to_lowercase(),
                })
                .await;
        }
        Ok(())
    }
}
