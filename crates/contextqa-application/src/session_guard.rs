//! Access gate for the chat surface.

use contextqa_core::session::{SessionId, SessionStore};
use contextqa_core::{Result, Route};
use std::sync::Arc;

/// Outcome of entering the chat surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// A session is active; the chat surface may be shown for it.
    Granted(SessionId),
    /// No session; nothing of the chat surface may be shown.
    Redirect(Route),
}

/// Reads the session store once per entry to the chat surface.
///
/// Synchronous and network-free. A store that cannot be read counts as
/// holding no session.
pub struct SessionGuard {
    store: Arc<dyn SessionStore>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn enter(&self) -> GuardDecision {
        match self.store.get() {
            Ok(Some(session_id)) => {
                tracing::info!("[SessionGuard] Entering chat for session {}", session_id);
                GuardDecision::Granted(session_id)
            }
            Ok(None) => {
                tracing::info!("[SessionGuard] No active session, redirecting to upload");
                GuardDecision::Redirect(Route::Upload)
            }
            Err(e) => {
                tracing::warn!("[SessionGuard] Session store unreadable ({}), redirecting", e);
                GuardDecision::Redirect(Route::Upload)
            }
        }
    }
}

/// Drops the active session so the user can upload new documents.
///
/// Returns the surface to show next.
pub fn start_new_upload(store: &dyn SessionStore) -> Result<Route> {
    store.clear()?;
    tracing::info!("[SessionGuard] Session cleared for a new upload");
    Ok(Route::Upload)
}
