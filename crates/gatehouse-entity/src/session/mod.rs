//! Session record stored in the ephemeral store.

mod model;

pub use model::{SessionMetadata, SessionRecord};
