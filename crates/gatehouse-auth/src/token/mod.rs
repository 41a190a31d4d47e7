//! RS256 token creation, validation, and revocation.

mod claims;
mod error;
mod manager;
mod revocation;

pub use claims::Claims;
pub use error::TokenError;
pub use manager::TokenManager;
pub use revocation::RevocationList;
