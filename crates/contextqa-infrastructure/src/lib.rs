//! Infrastructure layer for the ContextQA client.
//!
//! Filesystem-backed implementations of the core capabilities: platform
//! paths, atomic TOML records, the persisted session store and the
//! configuration loader.

pub mod config_service;
pub mod file_session_store;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use file_session_store::FileSessionStore;
pub use paths::ContextQaPaths;
