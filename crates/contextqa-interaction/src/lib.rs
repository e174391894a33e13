//! Network side of the ContextQA client.
//!
//! [`HttpBackend`] implements [`contextqa_core::backend::BackendApi`] against
//! the retrieval service's REST endpoints; [`files`] turns paths on disk into
//! upload parts.

pub mod files;
pub mod http_backend;

pub use files::{read_upload_file, read_upload_files};
pub use http_backend::HttpBackend;
