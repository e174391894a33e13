//! Session data types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque backend-assigned identifier scoping one uploaded-document context.
///
/// The client never inspects the value; it only stores it and echoes it
/// back on every chat request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a raw identifier, rejecting empty or whitespace-only values.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Persisted form of the active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    /// RFC 3339 timestamp of when the session was stored. Diagnostic only.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl SessionRecord {
    pub fn new(session_id: &SessionId) -> Self {
        Self {
            session_id: session_id.as_str().to_string(),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    /// Returns the identifier, or `None` when the stored value is blank.
    pub fn session_id(&self) -> Option<SessionId> {
        SessionId::parse(self.session_id.clone())
    }
}
