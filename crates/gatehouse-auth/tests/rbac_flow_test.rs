//! End-to-end tests for role management, permission resolution, and
//! the cache/session invalidation that follows every RBAC mutation.

mod support;

use gatehouse_core::error::ErrorKind;
use gatehouse_entity::role::{NewRole, UpdateRole};
use gatehouse_entity::session::SessionMetadata;
use support::TestHarness;

fn meta() -> SessionMetadata {
    SessionMetadata::default()
}

async fn registered_user(harness: &TestHarness, email: &str) -> uuid::Uuid {
    harness
        .auth
        .register(email, "Quiet-Lantern-Optics-42", "Test User")
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_check_permission_resolves_through_cache() {
    let harness = TestHarness::new();
    let user_id = registered_user(&harness, "alice@example.com").await;

    // member grants billing:read.
    assert!(
        harness
            .auth
            .rbac()
            .check_permission(user_id, "billing:read")
            .await
            .unwrap()
    );
    assert!(
        !harness
            .auth
            .rbac()
            .check_permission(user_id, "users:write")
            .await
            .unwrap()
    );

    // The first check primed the cache.
    assert!(harness.cache.get(user_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_assign_role_invalidates_stale_cache() {
    let harness = TestHarness::new();
    let user_id = registered_user(&harness, "bob@example.com").await;

    // Pre-seed a stale cache entry that lacks the new grant.
    harness
        .cache
        .put(user_id, &["users:read".to_string()])
        .await
        .unwrap();

    let admin_id = harness.role_id("admin").await;
    harness
        .auth
        .rbac()
        .assign_role(user_id, admin_id)
        .await
        .unwrap();

    // The mutation dropped the stale entry, so the check sees the
    // fresh grant.
    assert!(
        harness
            .auth
            .rbac()
            .check_permission(user_id, "users:write")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_revoke_role_destroys_sessions() {
    let harness = TestHarness::new();
    registered_user(&harness, "carol@example.com").await;
    let login = harness
        .auth
        .login("carol@example.com", "Quiet-Lantern-Optics-42", meta())
        .await
        .unwrap();

    let member_id = harness.role_id("member").await;
    harness
        .auth
        .rbac()
        .revoke_role(login.user.id, member_id)
        .await
        .unwrap();

    // The old token still has a valid signature but its session died
    // with the revocation.
    let err = harness.auth.validate_token(&login.token).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::Session));
    assert!(
        !harness
            .auth
            .rbac()
            .check_permission(login.user.id, "billing:read")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_set_role_permissions_cuts_off_holders() {
    let harness = TestHarness::new();
    let user_id = registered_user(&harness, "dave@example.com").await;
    let login = harness
        .auth
        .login("dave@example.com", "Quiet-Lantern-Optics-42", meta())
        .await
        .unwrap();

    let member_id = harness.role_id("member").await;
    let keep = harness
        .auth
        .rbac()
        .role_permissions(member_id)
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.name == "users:read")
        .unwrap();

    // Shrink member down to a single permission.
    harness
        .auth
        .rbac()
        .set_role_permissions(member_id, &[keep.id])
        .await
        .unwrap();

    let err = harness.auth.validate_token(&login.token).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::Session));
    assert!(
        !harness
            .auth
            .rbac()
            .check_permission(user_id, "billing:read")
            .await
            .unwrap()
    );
    assert!(
        harness
            .auth
            .rbac()
            .check_permission(user_id, "users:read")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_system_roles_are_protected() {
    let harness = TestHarness::new();
    let admin_id = harness.role_id("admin").await;

    let err = harness.auth.rbac().delete_role(admin_id).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::SystemRoleProtected));

    let err = harness
        .auth
        .rbac()
        .update_role(
            admin_id,
            UpdateRole {
                name: Some("superuser".to_string()),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_kind(ErrorKind::SystemRoleProtected));

    // Descriptions remain editable.
    let role = harness
        .auth
        .rbac()
        .update_role(
            admin_id,
            UpdateRole {
                name: None,
                description: Some("Full access".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(role.description.as_deref(), Some("Full access"));
}

#[tokio::test]
async fn test_custom_role_lifecycle() {
    let harness = TestHarness::new();

    let auditor = harness
        .auth
        .rbac()
        .create_role(NewRole {
            name: "auditor".to_string(),
            description: Some("Read-only audit access".to_string()),
        })
        .await
        .unwrap();
    assert!(!auditor.is_system);

    let err = harness
        .auth
        .rbac()
        .create_role(NewRole {
            name: "auditor".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_kind(ErrorKind::Conflict));

    let user_id = registered_user(&harness, "erin@example.com").await;
    harness
        .auth
        .rbac()
        .assign_role(user_id, auditor.id)
        .await
        .unwrap();

    harness.auth.rbac().delete_role(auditor.id).await.unwrap();
    let roles = harness.auth.rbac().list_roles().await.unwrap();
    assert!(roles.iter().all(|r| r.name != "auditor"));

    // The holder falls back to their remaining roles.
    assert!(
        harness
            .auth
            .rbac()
            .check_permission(user_id, "billing:read")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_check_permission_for_unknown_user_is_not_found() {
    let harness = TestHarness::new();
    let err = harness
        .auth
        .rbac()
        .check_permission(uuid::Uuid::new_v4(), "billing:read")
        .await
        .unwrap_err();
    assert!(err.is_kind(ErrorKind::NotFound));
}
