//! Password hashing, policy enforcement, and reset tokens.

mod hasher;
mod reset;
mod validator;

pub use hasher::PasswordHasher;
pub use reset::ResetTokenIssuer;
pub use validator::PasswordValidator;
