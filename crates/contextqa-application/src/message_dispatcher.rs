//! MessageDispatcher: the chat surface's state container.
//!
//! Holds the single [`ChatState`], applies every change through
//! [`contextqa_core::chat::reduce`], and publishes each new state to
//! subscribers over a `watch` channel. Network calls run on spawned tasks
//! and come back as `Resolve*` actions.

use contextqa_core::backend::{BackendApi, ChatRequest};
use contextqa_core::chat::{reduce, ChatAction, ChatState, IgnoreReason, OutstandingRequest};
use contextqa_core::session::SessionId;
use contextqa_core::{ClientError, OperationFallback, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const TIMEOUT_MESSAGE: &str = "Request timed out.";

/// Result of a submission attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// A request was issued; the handle completes once its resolution has
    /// been applied (or discarded after teardown).
    Dispatched(JoinHandle<()>),
    /// Nothing happened.
    Ignored(IgnoreReason),
}

impl SubmitOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched(_))
    }

    /// Waits for the issued request to resolve. No-op for `Ignored`.
    pub async fn resolved(self) {
        if let Self::Dispatched(handle) = self
            && let Err(e) = handle.await
        {
            tracing::error!("[Chat] Request task failed: {}", e);
        }
    }
}

/// Coordinates user input, the outstanding request and the transcript.
///
/// At most one chat request is in flight; submissions while it is pending
/// are dropped. Dropping the dispatcher (or calling [`shutdown`]) cancels
/// the pending request and guarantees its late resolution never touches
/// the state.
///
/// [`shutdown`]: MessageDispatcher::shutdown
pub struct MessageDispatcher {
    backend: Arc<dyn BackendApi>,
    state: Arc<watch::Sender<ChatState>>,
    cancel: CancellationToken,
    request_timeout: Option<Duration>,
}

impl MessageDispatcher {
    /// Creates a dispatcher bound to `session_id`.
    ///
    /// `request_timeout` bounds each chat request; `None` waits forever.
    pub fn new(
        backend: Arc<dyn BackendApi>,
        session_id: SessionId,
        request_timeout: Option<Duration>,
    ) -> Self {
        let (state, _) = watch::channel(ChatState::new(Some(session_id)));
        Self {
            backend,
            state: Arc::new(state),
            cancel: CancellationToken::new(),
            request_timeout,
        }
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> ChatState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.state.subscribe()
    }

    pub fn edit_draft(&self, text: impl Into<String>) {
        apply_unless_cancelled(&self.state, &self.cancel, ChatAction::EditDraft(text.into()));
    }

    /// Sends the current draft.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self) -> SubmitOutcome {
        if self.cancel.is_cancelled() {
            return SubmitOutcome::Ignored(IgnoreReason::Closed);
        }

        let mut started: Option<OutstandingRequest> = None;
        let mut ignored: Option<IgnoreReason> = None;

        self.state.send_if_modified(|state| match state.submit_readiness() {
            Ok(()) => {
                let next = reduce(state, ChatAction::Submit);
                started = next.outstanding();
                *state = next;
                true
            }
            Err(reason) => {
                ignored = Some(reason);
                false
            }
        });

        match started {
            Some(request) => SubmitOutcome::Dispatched(self.spawn_request(request)),
            None => {
                let reason = ignored.unwrap_or(IgnoreReason::Busy);
                tracing::debug!("[Chat] Submit ignored: {:?}", reason);
                SubmitOutcome::Ignored(reason)
            }
        }
    }

    /// Replaces the draft with `text` and submits it.
    pub fn send(&self, text: impl Into<String>) -> SubmitOutcome {
        if self.snapshot().is_sending() {
            // Leave the draft alone; the submission is dropped anyway
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        }
        self.edit_draft(text);
        self.submit()
    }

    /// Tears the surface down. Pending resolutions are discarded.
    pub fn shutdown(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        // Cancel under the state lock so no resolution can slip in between
        self.state.send_if_modified(|_| {
            self.cancel.cancel();
            false
        });
        tracing::debug!("[Chat] Dispatcher shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn spawn_request(&self, request: OutstandingRequest) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        let state = Arc::clone(&self.state);
        let cancel = self.cancel.clone();
        let timeout = self.request_timeout;

        tracing::debug!("[Chat] Request {}: {:?}", request.seq, request.message);

        tokio::spawn(async move {
            let seq = request.seq;
            let body = ChatRequest {
                session_id: request.session_id.to_string(),
                message: request.message,
            };

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("[Chat] Request {} cancelled by teardown", seq);
                    return;
                }
                result = with_timeout(timeout, backend.chat(&body)) => result,
            };

            let action = match result {
                Ok(reply) => {
                    tracing::info!("[Chat] Request {} answered", seq);
                    ChatAction::ResolveSuccess {
                        seq,
                        answer: reply.answer,
                    }
                }
                Err(e) => {
                    tracing::warn!("[Chat] Request {} failed: {}", seq, e);
                    ChatAction::ResolveFailure {
                        seq,
                        message: e.user_message(OperationFallback::CHAT),
                    }
                }
            };
            apply_unless_cancelled(&state, &cancel, action);
        })
    }
}

impl Drop for MessageDispatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Runs the reducer under the state lock; a torn-down surface is frozen.
fn apply_unless_cancelled(
    state: &watch::Sender<ChatState>,
    cancel: &CancellationToken,
    action: ChatAction,
) {
    state.send_if_modified(|current| {
        if cancel.is_cancelled() {
            return false;
        }
        let next = reduce(current, action);
        if next == *current {
            false
        } else {
            *current = next;
            true
        }
    });
}

async fn with_timeout<F, T>(timeout: Option<Duration>, future: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, future)
            .await
            .unwrap_or_else(|_| Err(ClientError::transport(TIMEOUT_MESSAGE))),
        None => future.await,
    }
}
