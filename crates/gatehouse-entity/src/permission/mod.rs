//! Permission entity model.

mod model;

pub use model::{NewPermission, Permission};
