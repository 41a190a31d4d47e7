//! Role entity model.

mod model;

pub use model::{NewRole, Role, UpdateRole};
