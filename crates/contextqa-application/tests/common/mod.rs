//! Shared test doubles for the application layer.

#![allow(dead_code)]

use async_trait::async_trait;
use contextqa_core::backend::{
    BackendApi, ChatReply, ChatRequest, HealthReply, UploadFile, UploadReply,
};
use contextqa_core::{ClientError, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Scripted behavior for one backend call.
#[derive(Debug, Clone)]
pub enum Reply {
    Answer(String),
    Session(String),
    Http(u16, Option<String>),
    Transport(String),
    /// Never resolves.
    Hang,
}

/// Backend double that replays scripted replies and records every call.
///
/// When `gated`, each chat call waits for one `release()` before answering.
#[derive(Default)]
pub struct MockBackend {
    chat_replies: Mutex<VecDeque<Reply>>,
    upload_replies: Mutex<VecDeque<Reply>>,
    chat_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
    uploaded_names: Mutex<Vec<Vec<String>>>,
    gate: Option<Notify>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub fn with_chat(self, reply: Reply) -> Self {
        self.chat_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_upload(self, reply: Reply) -> Self {
        self.upload_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Lets one gated chat call proceed.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn uploaded_names(&self) -> Vec<Vec<String>> {
        self.uploaded_names.lock().unwrap().clone()
    }

    fn next(queue: &Mutex<VecDeque<Reply>>) -> Reply {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::Transport("no scripted reply".to_string()))
    }
}

fn into_error(reply: Reply) -> ClientError {
    match reply {
        Reply::Http(status, detail) => ClientError::http(status, detail),
        Reply::Transport(message) => ClientError::transport(message),
        other => ClientError::transport(format!("unexpected scripted reply {:?}", other)),
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn upload(&self, files: &[UploadFile]) -> Result<UploadReply> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.uploaded_names
            .lock()
            .unwrap()
            .push(files.iter().map(|f| f.name.clone()).collect());

        match Self::next(&self.upload_replies) {
            Reply::Session(session_id) => Ok(UploadReply {
                session_id,
                indexed: Some(true),
                message: Some("Indexing complete with MMR".to_string()),
            }),
            Reply::Hang => std::future::pending().await,
            other => Err(into_error(other)),
        }
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match Self::next(&self.chat_replies) {
            Reply::Answer(answer) => Ok(ChatReply { answer }),
            Reply::Hang => std::future::pending().await,
            other => Err(into_error(other)),
        }
    }

    async fn health(&self) -> Result<HealthReply> {
        Ok(HealthReply {
            status: "ok".to_string(),
        })
    }
}

pub fn pdf(name: &str) -> UploadFile {
    UploadFile::new(name, "application/pdf", b"%PDF-1.7".to_vec())
}
