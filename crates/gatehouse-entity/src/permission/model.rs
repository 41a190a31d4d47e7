//! Permission entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single grantable capability, identified by `resource:action`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// Qualified name, `resource:action`.
    pub name: String,
    /// Resource the permission applies to.
    pub resource: String,
    /// Action allowed on the resource.
    pub action: String,
    /// Optional human-readable description.
    pub description: Option<String>,
}

impl Permission {
    /// Build the qualified `resource:action` name.
    pub fn qualified_name(resource: &str, action: &str) -> String {
        format!("{resource}:{action}")
    }
}

/// Data required to create a new permission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPermission {
    /// Resource the permission applies to.
    pub resource: String,
    /// Action allowed on the resource.
    pub action: String,
    /// Optional description.
    pub description: Option<String>,
}

impl NewPermission {
    /// The qualified name this permission will be stored under.
    pub fn name(&self) -> String {
        Permission::qualified_name(&self.resource, &self.action)
    }
}
