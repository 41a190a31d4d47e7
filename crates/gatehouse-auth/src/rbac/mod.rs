//! Role-based access control with cache-through permission resolution.

mod cache;
mod service;

pub use cache::PermissionCache;
pub use service::RbacService;
