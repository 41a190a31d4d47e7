//! Sliding-window session lifecycle in the ephemeral store.

mod manager;

pub use manager::SessionManager;
