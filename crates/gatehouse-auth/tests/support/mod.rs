//! Shared harness for integration tests: in-memory repositories and a
//! fully wired `AuthService` over the in-memory store.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gatehouse_auth::{
    AuthService, LockoutGuard, PasswordHasher, PasswordValidator, PermissionCache, RbacService,
    ResetTokenIssuer, RevocationList, SessionManager, TokenManager,
};
use gatehouse_core::config::store::MemoryStoreConfig;
use gatehouse_core::config::{AuthConfig, LockoutConfig, SessionConfig};
use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::TracingAuditSink;
use gatehouse_entity::permission::{NewPermission, Permission};
use gatehouse_entity::repository::{RbacRepository, UserRepository};
use gatehouse_entity::role::{NewRole, Role, UpdateRole};
use gatehouse_entity::user::{NewUser, User, UserAccess};
use gatehouse_store::StoreManager;
use gatehouse_store::memory::MemoryStore;

const PRIVATE_PEM: &str = include_str!("../../testdata/test_rsa_private.pem");
const PUBLIC_PEM: &str = include_str!("../../testdata/test_rsa_public.pem");

/// In-memory user repository.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        let email = new_user.email.to_lowercase();
        if users.values().any(|u| u.email == email) {
            return Err(AppError::conflict("Email already in use"));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: new_user.password_hash,
            display_name: new_user.display_name,
            is_active: true,
            is_locked: false,
            locked_until: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.is_active = is_active;
        Ok(())
    }

    async fn set_locked_until(&self, id: Uuid, until: Option<DateTime<Utc>>) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.is_locked = until.is_some();
        user.locked_until = until;
        Ok(())
    }
}

/// In-memory RBAC repository sharing the user map with
/// [`InMemoryUserRepository`].
#[derive(Debug)]
pub struct InMemoryRbacRepository {
    users: Arc<InMemoryUserRepository>,
    roles: Mutex<HashMap<Uuid, Role>>,
    permissions: Mutex<HashMap<Uuid, Permission>>,
    role_perms: Mutex<HashMap<Uuid, HashSet<Uuid>>>,
    user_roles: Mutex<HashMap<Uuid, HashSet<Uuid>>>,
}

impl InMemoryRbacRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            users,
            roles: Mutex::new(HashMap::new()),
            permissions: Mutex::new(HashMap::new()),
            role_perms: Mutex::new(HashMap::new()),
            user_roles: Mutex::new(HashMap::new()),
        }
    }

    /// Insert a role directly, bypassing conflict checks. Used to seed
    /// system roles.
    pub fn seed_role(&self, name: &str, is_system: bool) -> Role {
        let now = Utc::now();
        let role = Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            is_system,
            created_at: now,
            updated_at: now,
        };
        self.roles.lock().unwrap().insert(role.id, role.clone());
        role
    }

    pub fn seed_permission(&self, resource: &str, action: &str) -> Permission {
        let permission = Permission {
            id: Uuid::new_v4(),
            name: format!("{resource}:{action}"),
            resource: resource.to_string(),
            action: action.to_string(),
            description: None,
        };
        self.permissions
            .lock()
            .unwrap()
            .insert(permission.id, permission.clone());
        permission
    }

    pub fn grant(&self, role_id: Uuid, permission_id: Uuid) {
        self.role_perms
            .lock()
            .unwrap()
            .entry(role_id)
            .or_default()
            .insert(permission_id);
    }
}

#[async_trait]
impl RbacRepository for InMemoryRbacRepository {
    async fn create_role(&self, new_role: NewRole) -> AppResult<Role> {
        let mut roles = self.roles.lock().unwrap();
        if roles.values().any(|r| r.name == new_role.name) {
            return Err(AppError::conflict(format!(
                "Role '{}' already exists",
                new_role.name
            )));
        }
        let now = Utc::now();
        let role = Role {
            id: Uuid::new_v4(),
            name: new_role.name,
            description: new_role.description,
            is_system: false,
            created_at: now,
            updated_at: now,
        };
        roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn find_role_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        Ok(self.roles.lock().unwrap().get(&id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .values()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn update_role(&self, id: Uuid, update: UpdateRole) -> AppResult<Role> {
        let mut roles = self.roles.lock().unwrap();
        if let Some(name) = &update.name {
            if roles.values().any(|r| r.id != id && &r.name == name) {
                return Err(AppError::conflict("Role name already in use"));
            }
        }
        let role = roles
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))?;
        if let Some(name) = update.name {
            role.name = name;
        }
        if let Some(description) = update.description {
            role.description = Some(description);
        }
        role.updated_at = Utc::now();
        Ok(role.clone())
    }

    async fn delete_role(&self, id: Uuid) -> AppResult<()> {
        if self.roles.lock().unwrap().remove(&id).is_none() {
            return Err(AppError::not_found(format!("Role {id} not found")));
        }
        self.role_perms.lock().unwrap().remove(&id);
        for assigned in self.user_roles.lock().unwrap().values_mut() {
            assigned.remove(&id);
        }
        Ok(())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.roles.lock().unwrap().values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn create_permission(&self, new_permission: NewPermission) -> AppResult<Permission> {
        let name = new_permission.name();
        let mut permissions = self.permissions.lock().unwrap();
        if permissions.values().any(|p| p.name == name) {
            return Err(AppError::conflict(format!(
                "Permission '{name}' already exists"
            )));
        }
        let permission = Permission {
            id: Uuid::new_v4(),
            name,
            resource: new_permission.resource,
            action: new_permission.action,
            description: new_permission.description,
        };
        permissions.insert(permission.id, permission.clone());
        Ok(permission)
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let mut permissions: Vec<Permission> =
            self.permissions.lock().unwrap().values().cloned().collect();
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(permissions)
    }

    async fn set_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> AppResult<()> {
        self.role_perms
            .lock()
            .unwrap()
            .insert(role_id, permission_ids.iter().copied().collect());
        Ok(())
    }

    async fn role_permissions(&self, role_id: Uuid) -> AppResult<Vec<Permission>> {
        let granted = self
            .role_perms
            .lock()
            .unwrap()
            .get(&role_id)
            .cloned()
            .unwrap_or_default();
        let permissions = self.permissions.lock().unwrap();
        let mut result: Vec<Permission> = granted
            .iter()
            .filter_map(|id| permissions.get(id).cloned())
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn assign_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()> {
        self.user_roles
            .lock()
            .unwrap()
            .entry(user_id)
            .or_default()
            .insert(role_id);
        Ok(())
    }

    async fn revoke_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()> {
        if let Some(assigned) = self.user_roles.lock().unwrap().get_mut(&user_id) {
            assigned.remove(&role_id);
        }
        Ok(())
    }

    async fn user_access(&self, user_id: Uuid) -> AppResult<Option<UserAccess>> {
        let Some(user) = self.users.get(user_id) else {
            return Ok(None);
        };

        let assigned = self
            .user_roles
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default();

        let roles_map = self.roles.lock().unwrap();
        let mut roles: Vec<Role> = assigned
            .iter()
            .filter_map(|id| roles_map.get(id).cloned())
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));

        let role_perms = self.role_perms.lock().unwrap();
        let permissions_map = self.permissions.lock().unwrap();
        let mut seen = HashSet::new();
        let mut permissions = Vec::new();
        for role in &roles {
            for permission_id in role_perms.get(&role.id).cloned().unwrap_or_default() {
                if seen.insert(permission_id) {
                    if let Some(permission) = permissions_map.get(&permission_id) {
                        permissions.push(permission.clone());
                    }
                }
            }
        }

        Ok(Some(UserAccess {
            user,
            roles,
            permissions,
        }))
    }

    async fn users_with_role(&self, role_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .user_roles
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, assigned)| assigned.contains(&role_id))
            .map(|(user_id, _)| *user_id)
            .collect())
    }
}

/// A fully wired auth stack over in-memory backends.
pub struct TestHarness {
    pub auth: AuthService,
    pub users: Arc<InMemoryUserRepository>,
    pub rbac_repo: Arc<InMemoryRbacRepository>,
    pub cache: PermissionCache,
    pub store: StoreManager,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_lockout(LockoutConfig {
            max_failed_attempts: 5,
            attempt_window_minutes: 15,
            lockout_duration_minutes: 30,
        })
    }

    pub fn with_lockout(lockout_config: LockoutConfig) -> Self {
        let store = StoreManager::from_backend(Arc::new(MemoryStore::new(&MemoryStoreConfig {
            max_capacity: 100_000,
        })));

        let users = Arc::new(InMemoryUserRepository::default());
        let rbac_repo = Arc::new(InMemoryRbacRepository::new(users.clone()));

        // Mirror the seeded schema: system roles plus a small
        // permission set.
        let admin = rbac_repo.seed_role("admin", true);
        let member = rbac_repo.seed_role("member", true);
        let viewer = rbac_repo.seed_role("viewer", true);
        let billing_read = rbac_repo.seed_permission("billing", "read");
        let billing_write = rbac_repo.seed_permission("billing", "write");
        let users_read = rbac_repo.seed_permission("users", "read");
        let users_write = rbac_repo.seed_permission("users", "write");
        for p in [&billing_read, &billing_write, &users_read, &users_write] {
            rbac_repo.grant(admin.id, p.id);
        }
        rbac_repo.grant(member.id, billing_read.id);
        rbac_repo.grant(member.id, billing_write.id);
        rbac_repo.grant(member.id, users_read.id);
        rbac_repo.grant(viewer.id, users_read.id);

        let auth_config = AuthConfig {
            private_key_file: String::new(),
            public_key_file: String::new(),
            token_ttl_minutes: 60,
            password_min_length: 8,
            password_min_score: 0,
            reset_token_ttl_minutes: 30,
        };
        let session_config = SessionConfig::default();

        let tokens = Arc::new(
            TokenManager::from_pem(PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes(), 60).unwrap(),
        );
        let sessions = SessionManager::new(store.clone(), session_config.clone());
        let cache = PermissionCache::new(
            store.clone(),
            Duration::from_secs(session_config.permission_cache_ttl_seconds),
        );
        let audit = Arc::new(TracingAuditSink);

        let rbac = RbacService::new(
            rbac_repo.clone(),
            cache.clone(),
            sessions.clone(),
            audit.clone(),
        );

        let auth = AuthService::new(
            users.clone(),
            rbac,
            tokens,
            sessions,
            LockoutGuard::new(store.clone(), lockout_config),
            RevocationList::new(store.clone()),
            ResetTokenIssuer::new(store.clone(), Duration::from_secs(30 * 60)),
            PasswordHasher::new(),
            PasswordValidator::new(&auth_config),
            audit,
        );

        Self {
            auth,
            users,
            rbac_repo,
            cache,
            store,
        }
    }

    pub async fn role_id(&self, name: &str) -> Uuid {
        self.auth
            .rbac()
            .find_role_by_name(name)
            .await
            .unwrap()
            .unwrap()
            .id
    }
}
