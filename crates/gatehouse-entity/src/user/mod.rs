//! User entity and derived access view.

mod access;
mod model;

pub use access::UserAccess;
pub use model::{NewUser, User};
