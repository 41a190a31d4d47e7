//! Audit events emitted by the identity core.
//!
//! Events describe security-relevant state transitions. They are handed
//! to an [`crate::traits::AuditSink`] fire-and-forget; a failing sink
//! never fails the primary operation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A structured audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A new user account was registered.
    UserRegistered { user_id: Uuid, email: String },
    /// A login attempt succeeded.
    LoginSucceeded {
        user_id: Uuid,
        email: String,
        ip: Option<String>,
    },
    /// A login attempt failed (bad credentials or unknown account).
    LoginFailed { email: String, ip: Option<String> },
    /// An account was locked after repeated failures.
    AccountLocked { email: String },
    /// A user logged out and the session was destroyed.
    Logout { user_id: Uuid, session_id: String },
    /// A role was assigned to a user.
    RoleAssigned { user_id: Uuid, role: String },
    /// A role was revoked from a user.
    RoleRevoked { user_id: Uuid, role: String },
    /// A role was created.
    RoleCreated { role_id: Uuid, name: String },
    /// A role was updated.
    RoleUpdated { role_id: Uuid, name: String },
    /// A role was deleted.
    RoleDeleted { role_id: Uuid, name: String },
    /// A password reset token was issued.
    PasswordResetRequested { user_id: Uuid },
    /// A password was changed through the reset flow.
    PasswordChanged { user_id: Uuid },
}

impl AuditEvent {
    /// Dotted event name used by audit sinks.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => "user.registered",
            Self::LoginSucceeded { .. } => "user.login.succeeded",
            Self::LoginFailed { .. } => "user.login.failed",
            Self::AccountLocked { .. } => "user.account.locked",
            Self::Logout { .. } => "user.logout",
            Self::RoleAssigned { .. } => "user.role.assigned",
            Self::RoleRevoked { .. } => "user.role.revoked",
            Self::RoleCreated { .. } => "role.created",
            Self::RoleUpdated { .. } => "role.updated",
            Self::RoleDeleted { .. } => "role.deleted",
            Self::PasswordResetRequested { .. } => "user.password.reset_requested",
            Self::PasswordChanged { .. } => "user.password.changed",
        }
    }
}
