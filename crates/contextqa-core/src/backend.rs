//! Backend collaborator interface.
//!
//! The retrieval backend is external; the client only sees three endpoints.
//! This module defines their wire types and the trait the application layer
//! talks to, so the HTTP implementation can be swapped for a test double.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One document selected for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name sent in the multipart part.
    pub name: String,
    /// MIME type of the part.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Successful `POST /api/upload` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReply {
    pub session_id: String,
    #[serde(default)]
    pub indexed: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /api/chat` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

/// Successful `POST /api/chat` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
}

/// `GET /api/healthcheck` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReply {
    pub status: String,
}

impl HealthReply {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// The retrieval backend as seen by the client.
///
/// Implementations classify every failure into `ClientError::Http` (the
/// server answered with a non-2xx status) or `ClientError::Transport`
/// (no usable answer). They never retry.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Uploads documents and returns the new session.
    async fn upload(&self, files: &[UploadFile]) -> Result<UploadReply>;

    /// Sends one message within a session.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// Probes backend liveness.
    async fn health(&self) -> Result<HealthReply>;
}
