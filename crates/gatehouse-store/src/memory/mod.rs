//! In-memory store backend.

mod store;

pub use store::MemoryStore;
