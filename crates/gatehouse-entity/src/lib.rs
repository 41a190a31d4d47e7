//! # gatehouse-entity
//!
//! Domain entity models for the Gatehouse identity core, plus the
//! repository contracts the durable store must satisfy.
//!
//! Durable entities (`User`, `Role`, `Permission`) derive `sqlx::FromRow`;
//! `SessionRecord` lives only in the ephemeral store and is serde-only.

pub mod permission;
pub mod repository;
pub mod role;
pub mod session;
pub mod user;

pub use permission::{NewPermission, Permission};
pub use repository::{RbacRepository, UserRepository};
pub use role::{NewRole, Role, UpdateRole};
pub use session::{SessionMetadata, SessionRecord};
pub use user::{NewUser, User, UserAccess};
