//! Repository contracts the durable store must satisfy.
//!
//! Implementations live in `gatehouse-database`; tests substitute
//! in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatehouse_core::AppResult;
use uuid::Uuid;

use crate::permission::{NewPermission, Permission};
use crate::role::{NewRole, Role, UpdateRole};
use crate::user::{NewUser, User, UserAccess};

/// Durable storage of user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Insert a new user. Fails with a conflict if the email is taken.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Look up a user by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Look up a user by (lowercased) email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Replace the stored password hash.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()>;

    /// Enable or disable the account.
    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<()>;

    /// Set or clear the administrative lock.
    async fn set_locked_until(&self, id: Uuid, until: Option<DateTime<Utc>>) -> AppResult<()>;
}

/// Durable storage of roles, permissions, and their assignments.
#[async_trait]
pub trait RbacRepository: Send + Sync + 'static {
    /// Insert a new role. Fails with a conflict if the name is taken.
    async fn create_role(&self, new_role: NewRole) -> AppResult<Role>;

    /// Look up a role by id.
    async fn find_role_by_id(&self, id: Uuid) -> AppResult<Option<Role>>;

    /// Look up a role by name.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Apply a partial update to a role.
    async fn update_role(&self, id: Uuid, update: UpdateRole) -> AppResult<Role>;

    /// Delete a role and its assignments.
    async fn delete_role(&self, id: Uuid) -> AppResult<()>;

    /// List all roles.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Insert a new permission. Fails with a conflict if the qualified
    /// name is taken.
    async fn create_permission(&self, new_permission: NewPermission) -> AppResult<Permission>;

    /// List all permissions.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Replace the full permission set of a role in one transaction.
    async fn set_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> AppResult<()>;

    /// Permissions currently granted by a role.
    async fn role_permissions(&self, role_id: Uuid) -> AppResult<Vec<Permission>>;

    /// Assign a role to a user. Idempotent.
    async fn assign_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()>;

    /// Remove a role from a user. Idempotent.
    async fn revoke_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()>;

    /// Load a user together with their roles and the union of granted
    /// permissions.
    async fn user_access(&self, user_id: Uuid) -> AppResult<Option<UserAccess>>;

    /// Ids of all users currently holding a role.
    async fn users_with_role(&self, role_id: Uuid) -> AppResult<Vec<Uuid>>;
}
