//! # gatehouse-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for the Gatehouse durable entities.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{PgRbacRepository, PgUserRepository};
