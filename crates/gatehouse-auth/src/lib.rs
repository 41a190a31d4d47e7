//! # gatehouse-auth
//!
//! Complete authentication and authorization core for Gatehouse.
//!
//! ## Modules
//!
//! - `password` — Argon2id password hashing, policy enforcement, and reset tokens
//! - `token` — RS256 token creation, validation, and revocation
//! - `session` — Sliding-window session lifecycle in the ephemeral store
//! - `lockout` — Brute-force failed-login tracking and lockout
//! - `rbac` — Role and permission management with cache-through resolution
//! - `service` — The `AuthService` facade that orchestrates the above

pub mod lockout;
pub mod password;
pub mod rbac;
pub mod service;
pub mod session;
pub mod token;

pub use lockout::LockoutGuard;
pub use password::{PasswordHasher, PasswordValidator, ResetTokenIssuer};
pub use rbac::{PermissionCache, RbacService};
pub use service::{AuthService, AuthSession};
pub use session::SessionManager;
pub use token::{Claims, RevocationList, TokenError, TokenManager};
