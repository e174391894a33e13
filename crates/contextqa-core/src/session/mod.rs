//! Session identity and its persistence capability.

pub mod model;
pub mod store;

pub use model::{SessionId, SessionRecord};
pub use store::{MemorySessionStore, SessionStore};
