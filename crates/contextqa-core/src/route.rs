//! Surfaces of the client and the decisions that move between them.

use serde::Serialize;

/// A surface the front end can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Document upload; the entry point when no session exists.
    Upload,
    /// Conversation against the active session.
    Chat,
}
