//! Repository implementations for the Gatehouse durable entities.

pub mod rbac;
pub mod user;

pub use rbac::PgRbacRepository;
pub use user::PgUserRepository;
