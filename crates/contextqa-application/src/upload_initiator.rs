//! Upload surface logic: turns a file selection into an active session.

use contextqa_core::backend::{BackendApi, UploadFile};
use contextqa_core::session::{SessionId, SessionStore};
use contextqa_core::{ClientError, OperationFallback, Result, Route};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub const NO_FILES_MESSAGE: &str = "Please select at least one file.";
pub const BUSY_MESSAGE: &str = "An upload is already in progress.";
pub const SUCCESS_MESSAGE: &str = "Indexing complete. Redirecting…";

/// Inline status shown on the upload surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Uploading,
    /// Transient success indicator, shown during the hand-off delay.
    Succeeded { session_id: SessionId },
    /// Inline error banner.
    Failed { message: String },
}

impl UploadStatus {
    pub fn is_uploading(&self) -> bool {
        matches!(self, Self::Uploading)
    }
}

/// Submits selected files and, on success, persists the new session.
///
/// The session store is written only after the backend accepted the upload;
/// any failure leaves it untouched.
pub struct UploadInitiator {
    store: Arc<dyn SessionStore>,
    backend: Arc<dyn BackendApi>,
    handoff_delay: Duration,
    status: watch::Sender<UploadStatus>,
}

impl UploadInitiator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        backend: Arc<dyn BackendApi>,
        handoff_delay: Duration,
    ) -> Self {
        let (status, _) = watch::channel(UploadStatus::Idle);
        Self {
            store,
            backend,
            handoff_delay,
            status,
        }
    }

    /// Re-entry guard: upload is single-use per session.
    ///
    /// Returns `Some(Route::Chat)` when a session already exists.
    pub fn enter(&self) -> Option<Route> {
        match self.store.get() {
            Ok(Some(session_id)) => {
                tracing::info!("[Upload] Session {} already active, skipping upload", session_id);
                Some(Route::Chat)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("[Upload] Session store unreadable: {}", e);
                None
            }
        }
    }

    pub fn status(&self) -> UploadStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadStatus> {
        self.status.subscribe()
    }

    /// Uploads `files` and hands off to the chat surface.
    ///
    /// On success the session is stored, the status shows the success
    /// indicator for the hand-off delay, and the new session is returned.
    /// On failure the status carries the inline message and the error is
    /// returned; nothing is stored.
    pub async fn upload(&self, files: &[UploadFile]) -> Result<SessionId> {
        self.begin(files)?;

        match self.perform(files).await {
            Ok(session_id) => {
                self.status.send_replace(UploadStatus::Succeeded {
                    session_id: session_id.clone(),
                });
                tokio::time::sleep(self.handoff_delay).await;
                Ok(session_id)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Moves to `Uploading`, checked atomically against the current status.
    ///
    /// A running upload wins over every other outcome: the status is left
    /// alone and the call is rejected as busy. An empty selection is then
    /// reported inline without starting anything.
    fn begin(&self, files: &[UploadFile]) -> Result<()> {
        let mut outcome = Ok(());
        self.status.send_if_modified(|status| {
            if status.is_uploading() {
                outcome = Err(ClientError::validation(BUSY_MESSAGE));
                return false;
            }
            if files.is_empty() {
                let err = ClientError::validation(NO_FILES_MESSAGE);
                *status = UploadStatus::Failed {
                    message: err.user_message(OperationFallback::UPLOAD),
                };
                outcome = Err(err);
                return true;
            }
            *status = UploadStatus::Uploading;
            true
        });

        if let Err(e) = &outcome {
            tracing::warn!("[Upload] Not started: {}", e);
        }
        outcome
    }

    async fn perform(&self, files: &[UploadFile]) -> Result<SessionId> {
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        tracing::info!("[Upload] Uploading {:?}", names);

        let reply = self.backend.upload(files).await?;
        let session_id = SessionId::parse(reply.session_id).ok_or_else(|| {
            ClientError::transport("Malformed response from backend: empty session_id")
        })?;

        self.store.set(&session_id)?;
        tracing::info!(
            "[Upload] Session {} created (indexed: {:?}, message: {:?})",
            session_id,
            reply.indexed,
            reply.message
        );
        Ok(session_id)
    }

    fn fail(&self, err: ClientError) -> ClientError {
        let message = err.user_message(OperationFallback::UPLOAD);
        tracing::warn!("[Upload] Failed: {}", err);
        self.status.send_replace(UploadStatus::Failed { message });
        err
    }
}
