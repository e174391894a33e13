//! Session store capability.
//!
//! Defines the interface for persisting the single active session identifier.

use super::model::SessionId;
use crate::error::Result;
use std::sync::RwLock;

/// Persisted key/value capability holding at most one session identifier.
///
/// Absence of a value is the canonical "no active session" signal. The store
/// is passed explicitly to every component that needs it.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Survive client restarts (except in-memory test doubles)
/// - Treat a blank stored value as absent
/// - Make `clear` idempotent
pub trait SessionStore: Send + Sync {
    /// Reads the active session identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(SessionId))`: a session is active
    /// - `Ok(None)`: no active session
    /// - `Err(_)`: the backing storage could not be read
    fn get(&self) -> Result<Option<SessionId>>;

    /// Stores `session_id` as the active session, replacing any previous one.
    fn set(&self, session_id: &SessionId) -> Result<()>;

    /// Removes the active session. Succeeds when nothing was stored.
    fn clear(&self) -> Result<()>;
}

/// Volatile `SessionStore` used by tests and ephemeral clients.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session_id: RwLock<Option<SessionId>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `session_id`.
    pub fn with_session(session_id: SessionId) -> Self {
        Self {
            session_id: RwLock::new(Some(session_id)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<SessionId>> {
        let guard = self
            .session_id
            .read()
            .map_err(|e| crate::error::ClientError::storage(e.to_string()))?;
        Ok(guard.clone())
    }

    fn set(&self, session_id: &SessionId) -> Result<()> {
        let mut guard = self
            .session_id
            .write()
            .map_err(|e| crate::error::ClientError::storage(e.to_string()))?;
        *guard = Some(session_id.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .session_id
            .write()
            .map_err(|e| crate::error::ClientError::storage(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemorySessionStore::new();
        assert!(store.get().unwrap().is_none());

        let id = SessionId::parse("s-001").unwrap();
        store.set(&id).unwrap();
        assert_eq!(store.get().unwrap(), Some(id));

        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());

        // Clearing twice is fine
        store.clear().unwrap();
    }
}
