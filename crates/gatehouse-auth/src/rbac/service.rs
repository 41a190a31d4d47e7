//! Role and permission management.
//!
//! Every mutation that changes what a user may do follows the same
//! sequence before returning: persist the change, invalidate the
//! affected permission caches, then destroy the affected users'
//! sessions. A caller observing the mutation's success can rely on no
//! live session still carrying the old grants.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use gatehouse_core::error::AppError;
use gatehouse_core::events::AuditEvent;
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::AuditSink;
use gatehouse_entity::permission::{NewPermission, Permission};
use gatehouse_entity::repository::RbacRepository;
use gatehouse_entity::role::{NewRole, Role, UpdateRole};
use gatehouse_entity::user::UserAccess;

use crate::rbac::PermissionCache;
use crate::session::SessionManager;

/// Manages roles, permissions, and their assignment to users.
#[derive(Clone)]
pub struct RbacService {
    repo: Arc<dyn RbacRepository>,
    cache: PermissionCache,
    sessions: SessionManager,
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for RbacService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbacService").finish()
    }
}

impl RbacService {
    /// Create a new RBAC service.
    pub fn new(
        repo: Arc<dyn RbacRepository>,
        cache: PermissionCache,
        sessions: SessionManager,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            repo,
            cache,
            sessions,
            audit,
        }
    }

    // ── Role management ────────────────────────────────────

    /// Create a new role.
    pub async fn create_role(&self, new_role: NewRole) -> AppResult<Role> {
        let role = self.repo.create_role(new_role).await?;
        info!(role_id = %role.id, name = %role.name, "Role created");
        self.audit
            .record(AuditEvent::RoleCreated {
                role_id: role.id,
                name: role.name.clone(),
            })
            .await;
        Ok(role)
    }

    /// Update a role's name or description.
    ///
    /// System roles cannot be renamed.
    pub async fn update_role(&self, role_id: Uuid, update: UpdateRole) -> AppResult<Role> {
        let existing = self.require_role(role_id).await?;
        if existing.is_system && update.name.as_deref().is_some_and(|n| n != existing.name) {
            return Err(AppError::system_role_protected(format!(
                "System role '{}' cannot be renamed",
                existing.name
            )));
        }

        let role = self.repo.update_role(role_id, update).await?;
        self.audit
            .record(AuditEvent::RoleUpdated {
                role_id: role.id,
                name: role.name.clone(),
            })
            .await;
        Ok(role)
    }

    /// Delete a role, dropping it from every holder.
    ///
    /// System roles cannot be deleted.
    pub async fn delete_role(&self, role_id: Uuid) -> AppResult<()> {
        let role = self.require_role(role_id).await?;
        if role.is_system {
            return Err(AppError::system_role_protected(format!(
                "System role '{}' cannot be deleted",
                role.name
            )));
        }

        let holders = self.repo.users_with_role(role_id).await?;
        self.repo.delete_role(role_id).await?;
        self.cut_off_users(&holders).await?;

        info!(role_id = %role_id, name = %role.name, holders = holders.len(), "Role deleted");
        self.audit
            .record(AuditEvent::RoleDeleted {
                role_id,
                name: role.name,
            })
            .await;
        Ok(())
    }

    /// List all roles.
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.repo.list_roles().await
    }

    /// Look up a role by name.
    pub async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        self.repo.find_role_by_name(name).await
    }

    // ── Permission management ──────────────────────────────

    /// Create a new permission.
    pub async fn create_permission(&self, new_permission: NewPermission) -> AppResult<Permission> {
        self.repo.create_permission(new_permission).await
    }

    /// List all permissions.
    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.repo.list_permissions().await
    }

    /// Replace the full permission set of a role.
    ///
    /// The delete-and-insert runs in one transaction, then every
    /// current holder of the role is cut off.
    pub async fn set_role_permissions(
        &self,
        role_id: Uuid,
        permission_ids: &[Uuid],
    ) -> AppResult<()> {
        let role = self.require_role(role_id).await?;
        self.repo.set_role_permissions(role_id, permission_ids).await?;

        let holders = self.repo.users_with_role(role_id).await?;
        self.cut_off_users(&holders).await?;

        info!(role_id = %role_id, permissions = permission_ids.len(), holders = holders.len(),
              "Role permissions replaced");
        self.audit
            .record(AuditEvent::RoleUpdated {
                role_id,
                name: role.name,
            })
            .await;
        Ok(())
    }

    /// Permissions currently granted by a role.
    pub async fn role_permissions(&self, role_id: Uuid) -> AppResult<Vec<Permission>> {
        self.require_role(role_id).await?;
        self.repo.role_permissions(role_id).await
    }

    // ── Assignment ─────────────────────────────────────────

    /// Assign a role to a user.
    pub async fn assign_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()> {
        let role = self.require_role(role_id).await?;
        self.repo.assign_role(user_id, role_id).await?;
        self.cut_off_users(&[user_id]).await?;

        info!(user_id = %user_id, role = %role.name, "Role assigned");
        self.audit
            .record(AuditEvent::RoleAssigned {
                user_id,
                role: role.name,
            })
            .await;
        Ok(())
    }

    /// Revoke a role from a user.
    pub async fn revoke_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()> {
        let role = self.require_role(role_id).await?;
        self.repo.revoke_role(user_id, role_id).await?;
        self.cut_off_users(&[user_id]).await?;

        info!(user_id = %user_id, role = %role.name, "Role revoked");
        self.audit
            .record(AuditEvent::RoleRevoked {
                user_id,
                role: role.name,
            })
            .await;
        Ok(())
    }

    // ── Resolution ─────────────────────────────────────────

    /// Check whether a user holds a permission, by qualified name.
    ///
    /// Resolution is cache-through: a cached set answers directly; a
    /// miss loads the role graph from the database and primes the
    /// cache before answering.
    pub async fn check_permission(&self, user_id: Uuid, permission: &str) -> AppResult<bool> {
        let permissions = self.resolve_permissions(user_id).await?;
        Ok(permissions.iter().any(|p| p == permission))
    }

    /// Resolve a user's full permission set, priming the cache on miss.
    pub async fn resolve_permissions(&self, user_id: Uuid) -> AppResult<Vec<String>> {
        if let Some(cached) = self.cache.get(user_id).await? {
            return Ok(cached);
        }

        let access = self
            .repo
            .user_access(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        let permissions = access.permission_names();
        self.cache.put(user_id, &permissions).await?;
        Ok(permissions)
    }

    /// Load a user together with roles and permissions, bypassing the
    /// cache. Used at token issuance.
    pub async fn user_access(&self, user_id: Uuid) -> AppResult<Option<UserAccess>> {
        self.repo.user_access(user_id).await
    }

    /// Prime the permission cache from an already-loaded access view.
    pub async fn prime_cache(&self, access: &UserAccess) -> AppResult<()> {
        self.cache
            .put(access.user.id, &access.permission_names())
            .await
    }

    // ── Internals ──────────────────────────────────────────

    async fn require_role(&self, role_id: Uuid) -> AppResult<Role> {
        self.repo
            .find_role_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Role {role_id} not found")))
    }

    /// Invalidate caches and destroy sessions for the given users.
    ///
    /// Runs cache invalidation before session destruction so a request
    /// racing the mutation cannot re-prime the cache from a session
    /// that is about to die holding the old grants.
    async fn cut_off_users(&self, user_ids: &[Uuid]) -> AppResult<()> {
        for &user_id in user_ids {
            self.cache.invalidate(user_id).await?;
            self.sessions.destroy_all_for_user(user_id).await?;
        }
        Ok(())
    }
}
