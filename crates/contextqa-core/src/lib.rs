//! Domain layer for the ContextQA client.
//!
//! Holds everything that does not touch the network or the filesystem:
//! the session identifier and its store capability, the transcript and the
//! dispatcher reducer, assistant content normalization, the rendering
//! contract and the configuration model.

pub mod backend;
pub mod chat;
pub mod config;
pub mod content;
pub mod error;
pub mod render;
pub mod route;
pub mod session;

// Re-export common types
pub use error::{ClientError, OperationFallback, Result};
pub use route::Route;
pub use session::{SessionId, SessionStore};
