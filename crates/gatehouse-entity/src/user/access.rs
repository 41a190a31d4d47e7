//! Resolved access view of a user: roles plus the permissions they grant.

use serde::{Deserialize, Serialize};

use crate::permission::Permission;
use crate::role::Role;
use crate::user::User;

/// A user loaded together with their role and permission graph.
///
/// This is the source-of-truth view the permission cache is derived
/// from; it is loaded on cache misses and at token issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccess {
    /// The user record.
    pub user: User,
    /// All roles assigned to the user.
    pub roles: Vec<Role>,
    /// Union of the permissions granted by those roles.
    pub permissions: Vec<Permission>,
}

impl UserAccess {
    /// Role names in assignment order.
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.name.clone()).collect()
    }

    /// Deduplicated, sorted permission names.
    pub fn permission_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.permissions.iter().map(|p| p.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_permission_names_deduplicated() {
        let perm = |name: &str| Permission {
            id: Uuid::new_v4(),
            name: name.to_string(),
            resource: "billing".to_string(),
            action: "read".to_string(),
            description: None,
        };
        let access = UserAccess {
            user: User {
                id: Uuid::new_v4(),
                email: "a@example.com".to_string(),
                password_hash: String::new(),
                display_name: "A".to_string(),
                is_active: true,
                is_locked: false,
                locked_until: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            roles: vec![],
            permissions: vec![
                perm("billing:read"),
                perm("billing:read"),
                perm("billing:write"),
            ],
        };
        assert_eq!(access.permission_names(), vec!["billing:read", "billing:write"]);
    }
}
